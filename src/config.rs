use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:3050";
pub const DEFAULT_DATABASE: &str = "src/data/agendaEstudos.db";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub address: SocketAddr,
	pub database: PathBuf,
	pub public_dir: PathBuf,
}

impl Settings {
	/// Reads overrides from the process environment. Call after
	/// `dotenvy::dotenv()` so a `.env` file is honoured too.
	pub fn from_env() -> Result<Settings> {
		Settings::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Settings> {
		let address = get("AGENDA_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_owned());
		let address = address
			.parse::<SocketAddr>()
			.map_err(|e| Error::Config(format!("AGENDA_ADDRESS {address:?}: {e}")))?;

		Ok(Settings {
			address,
			database: get("AGENDA_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_owned()).into(),
			public_dir: get("AGENDA_PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_owned()).into(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| vars.get(key).cloned()
	}

	#[test]
	fn defaults_match_the_fixed_layout() {
		let settings = Settings::from_lookup(lookup(&[])).unwrap();
		assert_eq!(settings.address.port(), 3050);
		assert_eq!(settings.database, PathBuf::from("src/data/agendaEstudos.db"));
		assert_eq!(settings.public_dir, PathBuf::from("public"));
	}

	#[test]
	fn overrides_are_applied() {
		let settings = Settings::from_lookup(lookup(&[
			("AGENDA_ADDRESS", "127.0.0.1:8080"),
			("AGENDA_DATABASE", "/tmp/agenda.db"),
			("AGENDA_PUBLIC_DIR", "site"),
		]))
		.unwrap();
		assert_eq!(settings.address, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
		assert_eq!(settings.database, PathBuf::from("/tmp/agenda.db"));
		assert_eq!(settings.public_dir, PathBuf::from("site"));
	}

	#[test]
	fn bad_address_is_a_config_error() {
		let err = Settings::from_lookup(lookup(&[("AGENDA_ADDRESS", "localhost")])).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}
}

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::extract::Fields;
use crate::password;

pub type Uid = i64;
pub type Sid = i64;

/// Row of `usuarios` as exposed over HTTP. The password hash is never read
/// back out of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
	pub id: Uid,
	pub nome: Option<String>,
	pub email: Option<String>,
}

/// Row of `materias`. Only readable; nothing in the HTTP surface writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Subject {
	pub id: Sid,
	pub nome: Option<String>,
	pub descricao: Option<String>,
	pub professor: Option<String>,
	#[serde(serialize_with = "sqlite_timestamp")]
	pub data_registro: Option<NaiveDateTime>,
}

// keeps SQLite's CURRENT_TIMESTAMP layout instead of chrono's ISO 'T'
fn sqlite_timestamp<S: Serializer>(ts: &Option<NaiveDateTime>, s: S) -> std::result::Result<S::Ok, S::Error> {
	match ts {
		Some(ts) => s.collect_str(&ts.format("%Y-%m-%d %H:%M:%S")),
		None => s.serialize_none(),
	}
}

/// User values ready to be written: the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub nome: String,
	pub email: String,
	pub senha_hash: String,
}

const NAME_KEYS: &[&str] = &["nome_usuario", "name", "nome"];
const EMAIL_KEYS: &[&str] = &["email_usuario", "email"];
const PASSWORD_KEYS: &[&str] = &["texto_mensagem", "password", "senha"];
const ID_KEYS: &[&str] = &["id_usuario", "id"];

/// Submitted by `/usuarios-add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRegister {
	pub name: String,
	pub email: String,
	pub pass: String,
}

impl FormRegister {
	pub fn from_fields(fields: &Fields) -> Result<Self> {
		match (
			fields.first_of(NAME_KEYS),
			fields.first_of(EMAIL_KEYS),
			fields.first_of(PASSWORD_KEYS),
		) {
			(Some(name), Some(email), Some(pass)) => Ok(FormRegister {
				name: name.to_owned(),
				email: email.to_owned(),
				pass: pass.to_owned(),
			}),
			_ => Err(Error::MissingFields),
		}
	}

	pub fn into_new_user(self) -> Result<NewUser> {
		let senha_hash = password::hash_password(&self.pass)?;
		Ok(NewUser {
			nome: self.name,
			email: self.email,
			senha_hash,
		})
	}
}

/// Submitted by `/usuarios-update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormUpdate {
	pub id: Uid,
	pub user: FormRegister,
}

impl FormUpdate {
	pub fn from_fields(fields: &Fields) -> Result<Self> {
		// every field must be present before the id is even looked at
		let id = fields.first_of(ID_KEYS);
		let user = FormRegister::from_fields(fields)?;
		let id = id.ok_or(Error::MissingFields)?;
		let id = id
			.trim()
			.parse::<Uid>()
			.map_err(|_| Error::InvalidId(id.to_owned()))?;
		Ok(FormUpdate { id, user })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	fn fields(pairs: &[(&str, &str)]) -> Fields {
		pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
	}

	#[test]
	fn register_reads_form_and_json_names() {
		let html = fields(&[
			("nome_usuario", "Ana"),
			("email_usuario", "ana@x.com"),
			("texto_mensagem", "p1"),
		]);
		let api = fields(&[("name", "Ana"), ("email", "ana@x.com"), ("password", "p1")]);
		assert_eq!(
			FormRegister::from_fields(&html).unwrap(),
			FormRegister::from_fields(&api).unwrap()
		);
	}

	#[test]
	fn register_rejects_missing_or_empty() {
		let no_pass = fields(&[("name", "Ana"), ("email", "ana@x.com")]);
		assert!(matches!(FormRegister::from_fields(&no_pass), Err(Error::MissingFields)));

		let empty_email = fields(&[("name", "Ana"), ("email", ""), ("password", "p1")]);
		assert!(matches!(FormRegister::from_fields(&empty_email), Err(Error::MissingFields)));
	}

	#[test]
	fn update_requires_numeric_id() {
		let base = [("name", "Ana"), ("email", "ana@x.com"), ("password", "p1")];

		let missing = fields(&base);
		assert!(matches!(FormUpdate::from_fields(&missing), Err(Error::MissingFields)));

		let mut bad = base.to_vec();
		bad.push(("id", "um"));
		assert!(matches!(FormUpdate::from_fields(&fields(&bad)), Err(Error::InvalidId(_))));

		let mut ok = base.to_vec();
		ok.push(("id_usuario", "4"));
		assert_eq!(FormUpdate::from_fields(&fields(&ok)).unwrap().id, 4);
	}

	#[test]
	fn new_user_never_keeps_plain_password() {
		let form = FormRegister {
			name: "Ana".into(),
			email: "ana@x.com".into(),
			pass: "p1".into(),
		};
		let user = form.into_new_user().unwrap();
		assert_ne!(user.senha_hash, "p1");
		assert!(password::verify_password("p1", &user.senha_hash));
	}

	#[test]
	fn subject_timestamp_uses_sqlite_layout() {
		let subject = Subject {
			id: 1,
			nome: Some("Cálculo".into()),
			descricao: None,
			professor: Some("Rui".into()),
			data_registro: NaiveDate::from_ymd_opt(2026, 10, 19)
				.and_then(|d| d.and_hms_opt(12, 30, 5)),
		};
		let json = serde_json::to_value(&subject).unwrap();
		assert_eq!(json["data_registro"], "2026-10-19 12:30:05");
		assert_eq!(json["descricao"], serde_json::Value::Null);
	}

	#[test]
	fn user_json_has_no_password() {
		let user = User { id: 1, nome: Some("Ana".into()), email: Some("ana@x.com".into()) };
		let json = serde_json::to_value(&user).unwrap();
		assert_eq!(json, serde_json::json!({"id": 1, "nome": "Ana", "email": "ana@x.com"}));
	}
}

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{NewUser, Subject, Uid, User};

/// Tables in creation order. Column names match the store file the
/// form pages were built against, so an existing database keeps working.
pub const TABLE_SCHEMA: &[(&str, &str)] = &[
	("usuarios", r#"
CREATE TABLE IF NOT EXISTS usuarios (
	id INTEGER PRIMARY KEY AUTOINCREMENT,
	nome TEXT,
	email TEXT UNIQUE,
	senha TEXT
)"#),
	("materias", r#"
CREATE TABLE IF NOT EXISTS materias (
	id INTEGER PRIMARY KEY AUTOINCREMENT,
	nome TEXT,
	descricao TEXT,
	professor TEXT,
	data_registro DATETIME DEFAULT CURRENT_TIMESTAMP
)"#),
];

/// Owned handle on the SQLite store. Clones share the same pool.
#[derive(Clone, Debug)]
pub struct Store {
	db: SqlitePool,
}

impl Store {
	/// Opens (creating if absent) the store file at `path` and makes sure
	/// both tables exist before returning.
	pub async fn open(path: impl AsRef<Path>) -> Result<Store> {
		let path = path.as_ref();
		if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
			std::fs::create_dir_all(dir)?;
		}

		let options = SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true);

		let db = SqlitePoolOptions::new()
			.max_connections(5)
			.acquire_timeout(Duration::from_secs(3))
			.connect_with(options)
			.await?;
		info!(path = %path.display(), "connected to SQLite store");

		let store = Store { db };
		store.schema().await?;
		Ok(store)
	}

	/// Private in-memory store. Pinned to one connection that never
	/// expires, since every new connection would see an empty database.
	#[cfg(test)]
	pub async fn open_in_memory() -> Result<Store> {
		let options: SqliteConnectOptions = "sqlite::memory:".parse()?;
		let db = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await?;

		let store = Store { db };
		store.schema().await?;
		Ok(store)
	}

	/// Creates any missing table, one statement at a time in declaration
	/// order. Safe to run against an already initialised store.
	pub async fn schema(&self) -> Result<()> {
		for &(table, command) in TABLE_SCHEMA {
			sqlx::query(command).execute(&self.db).await?;
			info!(table, "table created or already present");
		}
		Ok(())
	}

	pub async fn list_users(&self) -> Result<Vec<User>> {
		sqlx::query_as::<_, User>("SELECT id, nome, email FROM usuarios ORDER BY id")
			.fetch_all(&self.db)
			.await
			.map_err(Error::Query)
	}

	pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
		sqlx::query_as::<_, Subject>(
			"SELECT id, nome, descricao, professor, data_registro FROM materias ORDER BY id",
		)
		.fetch_all(&self.db)
		.await
		.map_err(Error::Query)
	}

	// on Ok returns the new user's id
	pub async fn insert_user(&self, user: &NewUser) -> Result<Uid> {
		let done = sqlx::query("INSERT INTO usuarios (nome, email, senha) VALUES (?, ?, ?)")
			.bind(&user.nome)
			.bind(&user.email)
			.bind(&user.senha_hash)
			.execute(&self.db)
			.await
			.map_err(|e| Error::from_write(e, Error::Insert))?;
		Ok(done.last_insert_rowid())
	}

	// on Ok returns number of rows edited, 0 for an unknown id
	pub async fn update_user(&self, id: Uid, user: &NewUser) -> Result<u64> {
		let done = sqlx::query("UPDATE usuarios SET nome = ?, email = ?, senha = ? WHERE id = ?")
			.bind(&user.nome)
			.bind(&user.email)
			.bind(&user.senha_hash)
			.bind(id)
			.execute(&self.db)
			.await
			.map_err(|e| Error::from_write(e, Error::Update))?;
		Ok(done.rows_affected())
	}

	pub async fn close(&self) {
		self.db.close().await;
	}

	#[cfg(test)]
	pub async fn insert_subject(&self, nome: &str, professor: Option<&str>) -> Result<i64> {
		let done = sqlx::query("INSERT INTO materias (nome, professor) VALUES (?, ?)")
			.bind(nome)
			.bind(professor)
			.execute(&self.db)
			.await?;
		Ok(done.last_insert_rowid())
	}

	#[cfg(test)]
	pub async fn stored_password(&self, id: Uid) -> Result<String> {
		let (senha,): (String,) = sqlx::query_as("SELECT senha FROM usuarios WHERE id = ?")
			.bind(id)
			.fetch_one(&self.db)
			.await?;
		Ok(senha)
	}
}

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("required form fields are missing")]
	MissingFields,
	#[error("user id {0:?} is not an integer")]
	InvalidId(String),
	#[error("no user with id {0}")]
	UserNotFound(i64),
	#[error("email already registered")]
	DuplicateEmail,

	// failures of a single request's statement, one per route kind
	#[error("query failed: {0}")]
	Query(sqlx::Error),
	#[error("insert failed: {0}")]
	Insert(sqlx::Error),
	#[error("update failed: {0}")]
	Update(sqlx::Error),

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("password hashing failed: {0}")]
	Password(String),
	#[error("invalid configuration: {0}")]
	Config(String),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Classifies a failed write, splitting unique-index violations out so
	/// callers can answer them as a conflict.
	pub fn from_write(err: sqlx::Error, wrap: fn(sqlx::Error) -> Error) -> Error {
		match &err {
			sqlx::Error::Database(db) if db.is_unique_violation() => Error::DuplicateEmail,
			_ => wrap(err),
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			Error::MissingFields | Error::InvalidId(_) => StatusCode::BAD_REQUEST,
			Error::UserNotFound(_) => StatusCode::NOT_FOUND,
			Error::DuplicateEmail => StatusCode::CONFLICT,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Fixed text sent to the client. Store details only go to the log.
	pub fn message(&self) -> &'static str {
		match self {
			Error::MissingFields => "Todos os campos são obrigatórios.",
			Error::InvalidId(_) => "ID de usuário inválido.",
			Error::UserNotFound(_) => "Usuário não encontrado.",
			Error::DuplicateEmail => "E-mail já cadastrado.",
			Error::Query(_) => "Erro ao consultar o banco de dados.",
			Error::Insert(_) => "Erro ao inserir dados no banco de dados.",
			Error::Update(_) => "Erro ao atualizar dados no banco de dados.",
			_ => "Erro interno do servidor.",
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::warn!(error = %self, "request rejected");
		}
		(status, self.message()).into_response()
	}
}

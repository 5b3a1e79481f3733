use std::path::Path;

use axum::{
	extract::State,
	routing::{get, post},
	Json, Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::error::{Error, Result};
use crate::extract::Fields;
use crate::sql::Store;
use crate::types::{FormRegister, FormUpdate, NewUser, Subject, User};

pub const FORM_PAGE: &str = "formulario.html";
pub const ADDED: &str = "Formulário recebido com sucesso!";
pub const UPDATED: &str = "Formulário atualizado com sucesso!";

pub fn build_routes(store: Store, public_dir: &Path) -> Router {
	Router::new()
		.route_service("/", ServeFile::new(public_dir.join(FORM_PAGE)))
		.route("/usuarios", get(display_users))
		.route("/materias", get(display_subjects))
		.route("/usuarios-add", post(add_user))
		.route("/usuarios-update", post(update_user))
		.fallback_service(ServeDir::new(public_dir))
		.with_state(store)
}

async fn display_users(State(store): State<Store>) -> Result<Json<Vec<User>>> {
	Ok(Json(store.list_users().await?))
}

async fn display_subjects(State(store): State<Store>) -> Result<Json<Vec<Subject>>> {
	Ok(Json(store.list_subjects().await?))
}

async fn add_user(State(store): State<Store>, fields: Fields) -> Result<&'static str> {
	let form = FormRegister::from_fields(&fields)?;
	let user = hash_off_thread(form).await?;

	let id = store.insert_user(&user).await?;
	info!(id, email = %user.email, "user {} added", user.nome);
	Ok(ADDED)
}

async fn update_user(State(store): State<Store>, fields: Fields) -> Result<&'static str> {
	let FormUpdate { id, user } = FormUpdate::from_fields(&fields)?;
	let user = hash_off_thread(user).await?;

	if store.update_user(id, &user).await? == 0 {
		return Err(Error::UserNotFound(id));
	}
	info!(id, email = %user.email, "user {} updated", user.nome);
	Ok(UPDATED)
}

// argon2 is deliberately slow; keep it off the reactor threads
async fn hash_off_thread(form: FormRegister) -> Result<NewUser> {
	tokio::task::spawn_blocking(move || form.into_new_user())
		.await
		.map_err(|e| Error::Password(e.to_string()))?
}

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
	async_trait,
	extract::{FromRequest, Request},
	http::header::CONTENT_TYPE,
	Form, Json,
};
use serde_json::{Map, Value};

/// Flat name/value pairs of a submitted form, whether it came in as
/// `application/x-www-form-urlencoded` or as a JSON object.
///
/// A body that can't be read is an empty set of fields: the handlers
/// answer it the same way they answer a form with nothing filled in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fields(HashMap<String, String>);

impl Fields {
	/// First non-empty value among `keys`.
	pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
		keys.iter()
			.filter_map(|key| self.0.get(*key))
			.map(String::as_str)
			.find(|value| !value.is_empty())
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	// falsy scalars (false, 0, null) count as not filled in
	fn from_json(object: Map<String, Value>) -> Self {
		object
			.into_iter()
			.filter_map(|(key, value)| {
				let value = match value {
					Value::String(s) => s,
					Value::Number(n) if n.as_f64() == Some(0.0) => return None,
					Value::Number(n) => n.to_string(),
					Value::Bool(true) => "true".to_owned(),
					_ => return None,
				};
				Some((key, value))
			})
			.collect()
	}
}

impl FromIterator<(String, String)> for Fields {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		Fields(iter.into_iter().collect())
	}
}

#[async_trait]
impl<S> FromRequest<S> for Fields
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let content_type = req
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default()
			.to_ascii_lowercase();

		let fields = if content_type.starts_with("application/json") {
			match Json::<Map<String, Value>>::from_request(req, state).await {
				Ok(Json(object)) => Fields::from_json(object),
				Err(rejection) => {
					tracing::debug!(%rejection, "unreadable json body");
					Fields::default()
				}
			}
		} else {
			match Form::<HashMap<String, String>>::from_request(req, state).await {
				Ok(Form(map)) => Fields(map),
				Err(rejection) => {
					tracing::debug!(%rejection, "unreadable form body");
					Fields::default()
				}
			}
		};
		Ok(fields)
	}
}

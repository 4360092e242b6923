// src/services/books.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::log_and_rethrow;
use crate::config::endpoints;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::Book;

/// Catalog item as the commerce backend transmits it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BookResource {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub price: f64,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub stock: u32,
    pub language: Option<String>,
}

/// Pure resource↔entity mapping for catalog items.
pub mod assembler {
    use serde_json::Value;

    use super::BookResource;
    use crate::error::ClientError;
    use crate::http::TransportResponse;
    use crate::models::Book;
    use crate::services::envelope;

    pub fn to_entity(resource: BookResource) -> Book {
        Book {
            id: resource.id,
            title: resource.title,
            author: resource.author,
            description: resource.description,
            price: resource.price,
            cover_url: resource.cover_url,
            genre: resource.genre,
            stock: resource.stock,
            language: resource.language,
        }
    }

    pub fn to_resource(book: &Book) -> BookResource {
        BookResource {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            price: book.price,
            cover_url: book.cover_url.clone(),
            genre: book.genre.clone(),
            stock: book.stock,
            language: book.language.clone(),
        }
    }

    /// The catalog answers with a bare array; the enveloped shape is accepted
    /// anyway.
    pub fn entities_from_response(response: &TransportResponse) -> Result<Vec<Book>, ClientError> {
        match envelope::payload_of(response)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    let resource: BookResource = serde_json::from_value(item)?;
                    Ok(to_entity(resource))
                })
                .collect::<Result<Vec<_>, ClientError>>(),
            single => {
                let resource: BookResource = serde_json::from_value(single)?;
                Ok(vec![to_entity(resource)])
            }
        }
    }

    pub fn entity_from_response(response: &TransportResponse) -> Result<Book, ClientError> {
        let payload = envelope::payload_of(response)?;
        let resource: BookResource = serde_json::from_value(payload)?;
        Ok(to_entity(resource))
    }
}

/// Books endpoints of the commerce catalog. Takes the client configured with
/// the catalog base URL.
pub struct BookApiService {
    http: Arc<ApiClient>,
}

impl BookApiService {
    pub fn new(http: Arc<ApiClient>) -> Self {
        Self { http }
    }

    pub async fn get_books(&self) -> Result<Vec<Book>, ClientError> {
        let fetched = async {
            let response = self.http.get(endpoints::BOOKS).await?;
            assembler::entities_from_response(&response)
        }
        .await;
        fetched.map_err(|e| log_and_rethrow("Error fetching books", e))
    }

    /// Replace the stored record for one catalog item; returns the backend's
    /// echo of it.
    pub async fn update_book(&self, book: &Book) -> Result<Book, ClientError> {
        let updated = async {
            let resource = assembler::to_resource(book);
            let response = self
                .http
                .put(&endpoints::book_by_id(book.id), &resource)
                .await?;
            assembler::entity_from_response(&response)
        }
        .await;
        updated.map_err(|e| log_and_rethrow("Error updating book", e))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use httptest::{Expectation, Server, matchers::*, responders::*};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::http::NoopNavigator;
    use crate::session::{MemorySessionStore, Session};

    fn service_for(server: &Server) -> BookApiService {
        let session = Session::new(Arc::new(MemorySessionStore::default()));
        let base_url = Url::parse(&server.url_str("")).unwrap();
        BookApiService::new(Arc::new(ApiClient::new(
            base_url,
            session,
            Arc::new(NoopNavigator),
        )))
    }

    #[tokio::test]
    async fn get_books_accepts_a_bare_array() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/books")).respond_with(
                json_encoded(json!([
                    {"id": 1, "title": "Cien años de soledad", "author": "García Márquez",
                     "price": 12.5, "stock": 3},
                    {"id": 2, "title": "Rayuela", "author": "Cortázar", "price": 10.0, "stock": 0}
                ])),
            ),
        );

        let books = service_for(&server).get_books().await.unwrap();
        assert_eq!(books.len(), 2);
        assert!(books[0].in_stock());
        assert!(!books[1].in_stock());
    }

    #[tokio::test]
    async fn update_book_puts_full_resource_to_templated_path() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PUT", "/books/1"),
                request::body(json_decoded(eq(json!({
                    "id": 1,
                    "title": "Cien años de soledad",
                    "author": "García Márquez",
                    "description": null,
                    "price": 15.0,
                    "coverUrl": null,
                    "genre": null,
                    "stock": 3,
                    "language": null
                })))),
            ])
            .respond_with(json_encoded(json!({
                "id": 1, "title": "Cien años de soledad", "author": "García Márquez",
                "price": 15.0, "stock": 3
            }))),
        );

        let book = Book {
            id: 1,
            title: "Cien años de soledad".to_string(),
            author: "García Márquez".to_string(),
            description: None,
            price: 15.0,
            cover_url: None,
            genre: None,
            stock: 3,
            language: None,
        };
        let updated = service_for(&server).update_book(&book).await.unwrap();
        assert_eq!(updated.price, 15.0);
    }
}

//! Error conversion for GraphQL resolvers.
//!
//! async-graphql has a blanket `impl<T: Display> From<T> for Error`, so a bare
//! `?` on an `AppError` would drop the error code. Service results go through
//! [`GqlResultExt::gql`] instead, which attaches `extensions.code` and hides
//! internal details from clients.

use async_graphql::ErrorExtensions;

use crate::error::AppError;

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let message = if self.is_internal() {
            // Log the real error server-side; return a generic message to clients
            tracing::error!("Internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let code = self.code();
        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

pub trait GqlResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<AppError>> GqlResultExt<T> for Result<T, E> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}

//! Result alias and combinators for the safety layer.
//!
//! Success and failure are carried by the standard [`Result`], so `map`,
//! `map_err`, `and_then`, `is_ok`, and `is_err` come for free and stay
//! exhaustive over the closed [`AppError`] taxonomy. The one combinator the
//! standard library lacks is an asynchronous continuation, supplied here by
//! [`ResultExt::and_then_async`].

use std::future::Future;

use crate::error::AppError;

/// Outcome of a safe fetch: the decoded value, or a classified [`AppError`].
pub type ApiResult<T> = Result<T, AppError>;

/// Asynchronous chaining over a [`Result`].
pub trait ResultExt<T, E> {
    /// Chains an async continuation over the success value.
    ///
    /// Short-circuits on `Err` without invoking `f`; the continuation may
    /// itself fail, and its error becomes the overall result.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// let user = client.fetch_json::<User>("/users/1", opts).await;
    /// let posts = user
    ///     .and_then_async(|u| client.fetch_json::<Vec<Post>>(&format!("/users/{}/posts", u.id), opts2))
    ///     .await;
    /// ```
    fn and_then_async<U, F, Fut>(self, f: F) -> impl Future<Output = Result<U, E>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<U, E>>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    async fn and_then_async<U, F, Fut>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<U, E>>,
    {
        match self {
            Ok(value) => f(value).await,
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn and_then_async_chains_success() {
        let r: Result<u32, &str> = Ok(2);
        let out = r.and_then_async(|n| async move { Ok::<_, &str>(n * 10) }).await;
        assert_eq!(out, Ok(20));
    }

    #[tokio::test]
    async fn and_then_async_propagates_continuation_error() {
        let r: Result<u32, &str> = Ok(2);
        let out = r.and_then_async(|_| async { Err::<u32, &str>("later") }).await;
        assert_eq!(out, Err("later"));
    }

    #[tokio::test]
    async fn and_then_async_short_circuits_without_running() {
        let r: Result<u32, &str> = Err("early");
        let out: Result<u32, &str> = r
            .and_then_async(|_| async { unreachable!("continuation must not run on Err") })
            .await;
        assert_eq!(out, Err("early"));
    }
}

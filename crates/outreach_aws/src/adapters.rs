use std::future::Future;

pub mod bedrock;
pub mod console;
pub mod customer_store;
pub mod dynamodb;
pub mod text_generator;

/// Drives an SDK future to completion from synchronous adapter code running
/// on a multi-threaded tokio runtime.
pub(crate) fn block_on_current<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

//! Bridge from blocking callers into async code.
//!
//! Choice resolution is a blocking call, while resource fetching is async. This
//! module runs a future to completion from whatever context the caller is in:
//!
//! - inside a multi-threaded Tokio runtime, the worker is marked blocking and the
//!   current runtime drives the future;
//! - inside a current-thread runtime (where blocking the only worker would
//!   deadlock), the future runs on a scoped helper thread with its own runtime;
//! - outside any runtime, a single-threaded runtime is created for the call.

use std::{future::Future, io, thread};

use tokio::runtime::{Builder, Handle, RuntimeFlavor};

/// Execute `future` to completion from synchronous code.
///
/// # Errors
/// Returns an I/O error only when a fresh runtime cannot be created (or the
/// helper thread panicked).
pub fn block_on_future<F>(future: F) -> io::Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            Ok(tokio::task::block_in_place(|| handle.block_on(future)))
        }
        Ok(_) => thread::scope(|scope| {
            scope
                .spawn(|| run_on_fresh_runtime(future))
                .join()
                .map_err(|_| io::Error::other("blocking helper thread panicked"))?
        }),
        Err(_) => run_on_fresh_runtime(future),
    }
}

fn run_on_fresh_runtime<F: Future>(future: F) -> io::Result<F::Output> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_outside_a_runtime() {
        let value = block_on_future(async { 21 * 2 }).expect("runtime available");
        assert_eq!(value, 42);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn runs_inside_current_thread_runtime() {
        let value = block_on_future(async { "nested" }).expect("helper runtime available");
        assert_eq!(value, "nested");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn runs_inside_multi_thread_runtime() {
        let value = block_on_future(async {
            tokio::task::yield_now().await;
            7
        })
        .expect("current runtime reused");
        assert_eq!(value, 7);
    }
}

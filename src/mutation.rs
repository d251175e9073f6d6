//! Mutation handles
//!
//! A [`Mutation`] pairs a trigger with an observable status, so callers can
//! render in-flight, error and success states without tracking them.

use futures::future::BoxFuture;
use remote_store::RemoteQueryError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error(RemoteQueryError),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }

    pub fn error(&self) -> Option<&RemoteQueryError> {
        match self {
            MutationStatus::Error(e) => Some(e),
            _ => None,
        }
    }
}

type MutationFn<I, O> =
    Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, RemoteQueryError>> + Send + Sync>;

/// Trigger plus status for one kind of mutation.
///
/// Clones share the status. With overlapping calls the status follows
/// whichever call changed it last.
pub struct Mutation<I, O> {
    run: MutationFn<I, O>,
    status: Arc<watch::Sender<MutationStatus>>,
}

impl<I, O> Clone for Mutation<I, O> {
    fn clone(&self) -> Self {
        Self {
            run: self.run.clone(),
            status: self.status.clone(),
        }
    }
}

impl<I, O> std::fmt::Debug for Mutation<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutation")
            .field("status", &*self.status.borrow())
            .finish()
    }
}

impl<I, O> Mutation<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, RemoteQueryError>> + Send + 'static,
    {
        let (status, _) = watch::channel(MutationStatus::Idle);
        Self {
            run: Arc::new(
                move |input: I| -> BoxFuture<'static, Result<O, RemoteQueryError>> {
                    Box::pin(run(input))
                },
            ),
            status: Arc::new(status),
        }
    }

    /// Run the mutation, moving the status through Pending to Success or Error
    pub async fn mutate(&self, input: I) -> Result<O, RemoteQueryError> {
        self.status.send_replace(MutationStatus::Pending);

        let result = (self.run)(input).await;
        match &result {
            Ok(_) => self.status.send_replace(MutationStatus::Success),
            Err(e) => self.status.send_replace(MutationStatus::Error(e.clone())),
        };

        result
    }

    pub fn status(&self) -> MutationStatus {
        self.status.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status.borrow().is_pending()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<MutationStatus> {
        self.status.subscribe()
    }

    /// Back to Idle, e.g. after an error was shown
    pub fn reset(&self) {
        self.status.send_replace(MutationStatus::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_status_transitions() {
        let mutation = Mutation::new(|n: i32| async move {
            if n > 0 {
                Ok(n * 2)
            } else {
                Err(RemoteQueryError::invalid_input("n must be positive"))
            }
        });
        assert_eq!(mutation.status(), MutationStatus::Idle);

        assert_eq!(mutation.mutate(2).await, Ok(4));
        assert_eq!(mutation.status(), MutationStatus::Success);

        let err = mutation.mutate(0).await.unwrap_err();
        assert_eq!(mutation.status().error(), Some(&err));

        mutation.reset();
        assert_eq!(mutation.status(), MutationStatus::Idle);
    }

    #[tokio::test]
    async fn test_pending_while_in_flight() {
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let release_rx = Arc::new(tokio::sync::Mutex::new(Some(release_rx)));

        let mutation = Mutation::new(move |_: ()| {
            let release_rx = release_rx.clone();
            async move {
                if let Some(rx) = release_rx.lock().await.take() {
                    let _ = rx.await;
                }
                Ok(())
            }
        });

        let mut status = mutation.subscribe();
        let running = tokio::spawn({
            let mutation = mutation.clone();
            async move { mutation.mutate(()).await }
        });

        status
            .wait_for(MutationStatus::is_pending)
            .await
            .unwrap();
        assert!(mutation.is_pending());

        release_tx.send(()).unwrap();
        running.await.unwrap().unwrap();
        assert_eq!(mutation.status(), MutationStatus::Success);
    }
}

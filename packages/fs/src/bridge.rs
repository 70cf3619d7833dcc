//! Promise bridge: blocking waits over pending host operations.
//!
//! Each wait pairs the calling task with two single-fire channels, one for
//! the success branch and one for the failure branch of a [`Pending`]
//! settlement. Exactly one fires; the subscription and both channels are
//! released on every path out of the wait, so nothing registered against the
//! host outlives the call.
//!
//! There is no timeout or cancellation: a wait on an operation the host
//! never settles blocks its task forever. Callers that need a deadline must
//! race the wait externally.

use crossbeam_channel::{bounded, select};
use originfs_host::{HostError, Pending};
use tracing::trace;

/// Block until `pending` settles, returning its full success payload.
pub fn wait<T: Send + 'static>(pending: &Pending<T>) -> Result<Vec<T>, HostError> {
    let (ok_tx, ok_rx) = bounded::<Vec<T>>(1);
    let (err_tx, err_rx) = bounded::<HostError>(1);

    // The subscription guard unregisters both adapters when this function
    // returns, fired or not; the channels close with it.
    let _sub = pending.subscribe(
        move |values| {
            let _ = ok_tx.send(values);
        },
        move |err| {
            let _ = err_tx.send(err);
        },
    );

    select! {
        recv(ok_rx) -> msg => match msg {
            Ok(values) => {
                trace!(count = values.len(), "pending operation resolved");
                Ok(values)
            }
            Err(_) => Err(HostError::Contract(
                "success channel closed before settling".to_string(),
            )),
        },
        recv(err_rx) -> msg => match msg {
            Ok(err) => {
                trace!(%err, "pending operation rejected");
                Err(err)
            }
            Err(_) => Err(HostError::Contract(
                "failure channel closed before settling".to_string(),
            )),
        },
    }
}

/// Block until `pending` settles, requiring the success payload to carry
/// exactly one value. Any other arity is a host contract violation.
pub fn wait_one<T: Send + 'static>(pending: &Pending<T>) -> Result<T, HostError> {
    let mut values = wait(pending)?;
    if values.len() != 1 {
        return Err(HostError::Contract(format!(
            "expected exactly one resolved value, got {}",
            values.len()
        )));
    }
    Ok(values.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn wait_on_already_settled() {
        let pending = Pending::resolved(vec![1u32, 2]);
        assert_eq!(wait(&pending).unwrap(), vec![1, 2]);
    }

    #[test]
    fn wait_blocks_until_settled_from_another_thread() {
        let (pending, settler) = Pending::channel();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            settler.resolve_one("late".to_string());
        });
        assert_eq!(wait_one(&pending).unwrap(), "late");
        handle.join().unwrap();
    }

    #[test]
    fn rejection_comes_back_as_error() {
        let pending = Pending::<u32>::rejected(HostError::Storage("quota".to_string()));
        assert!(matches!(
            wait(&pending),
            Err(HostError::Storage(message)) if message == "quota"
        ));
    }

    #[test]
    fn rejection_from_another_thread() {
        let (pending, settler) = Pending::<u32>::channel();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            settler.reject(HostError::NotFound("slot1".to_string()));
        });
        assert!(matches!(
            wait_one(&pending),
            Err(HostError::NotFound(name)) if name == "slot1"
        ));
        handle.join().unwrap();
    }

    #[test]
    fn wait_one_rejects_wrong_arity() {
        let empty = Pending::<u32>::resolved(Vec::new());
        assert!(matches!(wait_one(&empty), Err(HostError::Contract(_))));

        let double = Pending::resolved(vec![1u32, 2]);
        assert!(matches!(wait_one(&double), Err(HostError::Contract(_))));
    }

    #[test]
    fn second_wait_on_consumed_settlement_errors_out() {
        let pending = Pending::resolved_one(9u32);
        assert_eq!(wait_one(&pending).unwrap(), 9);
        // The payload fired once; a second wait cannot observe it again and
        // must report a contract violation rather than hang or panic.
        assert!(matches!(wait(&pending), Err(HostError::Contract(_))));
    }
}

#[cfg(feature = "bucket")]
pub mod bucket;
#[cfg(feature = "config")]
pub mod config;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "persistence")]
pub mod persistence;

pub async fn retry_async<F, Fut, O, E>(
    timeout: std::time::Duration,
    tries: usize,
    func: F,
) -> Result<O, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<O, E>>,
{
    let mut attempt = 0;
    loop {
        match func().await {
            Ok(o) => return Ok(o),
            Err(e) => {
                attempt += 1;
                if attempt >= tries {
                    return Err(e);
                }
                tokio::time::sleep(timeout).await;
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn retry_async_stops_after_first_success() {
        let calls = AtomicUsize::new(0);
        let result: Result<usize, &str> = retry_async(Duration::from_millis(1), 5, || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 { Err("not yet") } else { Ok(n) }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_async_gives_up_with_last_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), usize> = retry_async(Duration::from_millis(1), 3, || async {
            Err(calls.fetch_add(1, Ordering::SeqCst))
        })
        .await;

        assert_eq!(result, Err(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}

use crate::error::{Error, Result};
use crate::fetchers::Fetcher;
use crate::results::FetchResult;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// URL queue receiver shared by every worker of a pool
pub type SharedUrlReceiver = Arc<Mutex<mpsc::Receiver<String>>>;

/// Spawns `num_workers` fetch workers and a task that watches their completion
///
/// All workers pull from `url_rx` and push onto `result_tx`. The returned
/// handle resolves to the number of workers that signalled completion, after
/// the result queue has been closed. A worker count of zero is rejected
/// before anything is spawned.
pub fn spawn_workers(
    num_workers: usize,
    fetcher: Arc<dyn Fetcher>,
    url_rx: mpsc::Receiver<String>,
    result_tx: mpsc::Sender<FetchResult>,
) -> Result<JoinHandle<usize>> {
    if num_workers == 0 {
        return Err(Error::config("workers", "worker count must be at least 1"));
    }

    let url_rx = Arc::new(Mutex::new(url_rx));
    let (completion_tx, completion_rx) = mpsc::channel::<usize>(num_workers);

    for i in 0..num_workers {
        spawn_worker(
            i,
            Arc::clone(&fetcher),
            Arc::clone(&url_rx),
            result_tx.clone(),
            completion_tx.clone(),
        );
    }

    // Each worker holds its own copy
    drop(completion_tx);

    Ok(tokio::spawn(watch_completion(
        num_workers,
        completion_rx,
        result_tx,
    )))
}

/// Waits until every worker is done, then closes the result queue
///
/// The watcher owns the last result sender that outlives the workers, so
/// dropping it here is what ends the presenter's loop.
async fn watch_completion(
    num_workers: usize,
    mut completion_rx: mpsc::Receiver<usize>,
    result_tx: mpsc::Sender<FetchResult>,
) -> usize {
    let mut completed_workers = 0;
    while let Some(worker_id) = completion_rx.recv().await {
        completed_workers += 1;
        ::log::debug!(
            "Worker {} completed. {} of {} workers done.",
            worker_id,
            completed_workers,
            num_workers
        );
        if completed_workers == num_workers {
            break;
        }
    }

    if completed_workers == num_workers {
        ::log::info!("All {} workers have completed", num_workers);
    } else {
        ::log::warn!(
            "Only {} of {} workers signalled completion",
            completed_workers,
            num_workers
        );
    }

    drop(result_tx);
    completed_workers
}

/// Spawns a single worker
///
/// The worker processes URLs until the URL queue is closed and drained, then
/// releases its result sender and signals completion.
fn spawn_worker(
    worker_id: usize,
    fetcher: Arc<dyn Fetcher>,
    url_rx: SharedUrlReceiver,
    result_tx: mpsc::Sender<FetchResult>,
    completion_tx: mpsc::Sender<usize>,
) {
    ::log::trace!("Spawning worker {}", worker_id);

    tokio::spawn(async move {
        let processed =
            worker_processing_loop(worker_id, fetcher.as_ref(), &url_rx, &result_tx).await;
        ::log::debug!("Worker {} finished after {} URLs", worker_id, processed);

        // The queue must not see this worker's sender once completion is signalled
        drop(result_tx);

        if let Err(e) = completion_tx.send(worker_id).await {
            ::log::error!(
                "Worker {} failed to send completion signal: {}",
                worker_id,
                e
            );
        }
    });
}

/// Main processing loop for a worker, returns how many results it delivered
async fn worker_processing_loop(
    worker_id: usize,
    fetcher: &dyn Fetcher,
    url_rx: &SharedUrlReceiver,
    result_tx: &mpsc::Sender<FetchResult>,
) -> usize {
    ::log::debug!("Worker {} starting processing loop", worker_id);
    let mut processed = 0;

    while let Some(url) = get_next_url(worker_id, url_rx).await {
        let started = std::time::Instant::now();
        let result = fetcher.fetch(url).await;
        ::log::debug!(
            "Worker {} processed {} in {:.2} seconds",
            worker_id,
            result.url,
            started.elapsed().as_secs_f64()
        );

        if let Err(e) = result_tx.send(result).await {
            ::log::warn!(
                "Worker {} stopping, result queue is closed: {}",
                worker_id,
                e
            );
            break;
        }
        processed += 1;
    }

    processed
}

/// Gets the next URL from the shared queue, `None` once it is closed and empty
async fn get_next_url(worker_id: usize, url_rx: &SharedUrlReceiver) -> Option<String> {
    let mut rx = url_rx.lock().await;
    let url = rx.recv().await;

    match &url {
        Some(url_str) => ::log::trace!("Worker {} processing: {}", worker_id, url_str),
        None => ::log::debug!(
            "Worker {} received queue close signal - no more URLs to process",
            worker_id
        ),
    }

    url
}

//! Background bridge worker connecting the UI to a [`BackendApi`].
//!
//! The worker runs on a dedicated thread, draining a request channel and
//! pushing replies into a bounded mailbox the UI drains on its tick.
//! Lookup and calculation requests carry a generation sequence; the UI
//! asks [`BridgeClient::lookup_is_latest`] /
//! [`BridgeClient::calculation_is_latest`] before applying a reply, which
//! makes stale responses (superseded while in flight) droppable without
//! any ordering guarantee from the backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::JoinHandle;

use bcturbo_core::Result;
use bcturbo_core::models::{
    CalculateReply, ExportReply, FolderKind, FolderSelection, ImportSummary, LookupReply,
    LookupRequest, SimulationRequest,
};

use crate::api::BackendApi;

/// Max undrained replies kept before the oldest is dropped.
const REPLY_QUEUE_CAPACITY: usize = 256;

/// A request crossing the bridge boundary.
#[derive(Debug, Clone)]
pub enum BridgeRequest {
    SelectFolder { kind: FolderKind },
    Lookup { seq: u64, request: LookupRequest },
    Calculate { seq: u64, request: SimulationRequest },
    ImportAsis,
    ExportResults,
}

/// A reply delivered back to the UI mailbox.
#[derive(Debug)]
pub enum BridgeReply {
    Folder {
        kind: FolderKind,
        outcome: Result<FolderSelection>,
    },
    Lookup {
        seq: u64,
        outcome: Result<LookupReply>,
    },
    Calculation {
        seq: u64,
        outcome: Result<CalculateReply>,
    },
    Import {
        outcome: Result<ImportSummary>,
    },
    Export {
        outcome: Result<ExportReply>,
    },
}

/// Handle owning the bridge worker thread and its channels.
pub struct BridgeClient {
    tx: Sender<BridgeRequest>,
    replies: Arc<Mutex<VecDeque<BridgeReply>>>,
    lookup_seq: AtomicU64,
    calc_seq: AtomicU64,
    worker: Option<JoinHandle<()>>,
}

impl BridgeClient {
    /// Spawn the worker thread servicing `backend`.
    #[must_use]
    pub fn spawn(backend: Arc<dyn BackendApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        let replies = Arc::new(Mutex::new(VecDeque::with_capacity(REPLY_QUEUE_CAPACITY)));
        let worker_replies = Arc::clone(&replies);
        let worker = std::thread::Builder::new()
            .name("bcturbo-bridge".to_string())
            .spawn(move || worker_loop(&rx, backend.as_ref(), &worker_replies))
            .ok();
        if worker.is_none() {
            tracing::error!("failed to spawn bridge worker thread");
        }

        Self {
            tx,
            replies,
            lookup_seq: AtomicU64::new(0),
            calc_seq: AtomicU64::new(0),
            worker,
        }
    }

    /// Queue a request. Returns `false` when the worker is gone.
    pub fn submit(&self, request: BridgeRequest) -> bool {
        let ok = self.tx.send(request).is_ok();
        if !ok {
            tracing::warn!("bridge worker unavailable; request dropped");
        }
        ok
    }

    /// Allocate the next lookup generation. The returned sequence is the
    /// latest until the next call; older in-flight lookups become stale.
    #[must_use]
    pub fn begin_lookup(&self) -> u64 {
        self.lookup_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Whether `seq` is still the newest issued lookup generation.
    #[must_use]
    pub fn lookup_is_latest(&self, seq: u64) -> bool {
        self.lookup_seq.load(Ordering::Relaxed) == seq
    }

    /// Allocate the next calculation generation.
    #[must_use]
    pub fn begin_calculation(&self) -> u64 {
        self.calc_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Whether `seq` is still the newest issued calculation generation.
    #[must_use]
    pub fn calculation_is_latest(&self, seq: u64) -> bool {
        self.calc_seq.load(Ordering::Relaxed) == seq
    }

    /// Drain all pending replies (FIFO).
    #[must_use]
    pub fn drain_replies(&self) -> Vec<BridgeReply> {
        let mut queue = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        queue.drain(..).collect()
    }

    /// Number of undrained replies, for diagnostics.
    #[must_use]
    pub fn pending_replies(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        let (closed_tx, _closed_rx) = mpsc::channel();
        drop(std::mem::replace(&mut self.tx, closed_tx));
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn push_reply(replies: &Mutex<VecDeque<BridgeReply>>, reply: BridgeReply) {
    let mut queue = replies
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if queue.len() >= REPLY_QUEUE_CAPACITY {
        let _ = queue.pop_front();
        tracing::warn!("bridge reply queue full; dropped oldest reply");
    }
    queue.push_back(reply);
}

fn worker_loop(
    rx: &Receiver<BridgeRequest>,
    backend: &dyn BackendApi,
    replies: &Mutex<VecDeque<BridgeReply>>,
) {
    while let Ok(request) = rx.recv() {
        let reply = match request {
            BridgeRequest::SelectFolder { kind } => {
                tracing::debug!(kind = kind.as_str(), "bridge: select folder");
                BridgeReply::Folder {
                    kind,
                    outcome: backend.select_folder(kind),
                }
            }
            BridgeRequest::Lookup { seq, request } => {
                tracing::debug!(seq, code = %request.code, "bridge: lookup");
                BridgeReply::Lookup {
                    seq,
                    outcome: backend.lookup(&request),
                }
            }
            BridgeRequest::Calculate { seq, request } => {
                tracing::debug!(seq, "bridge: calculate");
                BridgeReply::Calculation {
                    seq,
                    outcome: backend.calculate(&request),
                }
            }
            BridgeRequest::ImportAsis => {
                tracing::debug!("bridge: import AS-IS");
                BridgeReply::Import {
                    outcome: backend.import_asis(),
                }
            }
            BridgeRequest::ExportResults => {
                tracing::debug!("bridge: export results");
                BridgeReply::Export {
                    outcome: backend.export_results(),
                }
            }
        };
        push_reply(replies, reply);
    }
}

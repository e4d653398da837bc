//! Connection Handler
//!
//! Submits tagged requests and routes tagged replies back to their futures.

use std::collections::HashMap;
use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::{Fulfiller, ResultFuture};
use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::protocol::{encode_request, read_frame, write_frame, Request};

/// Anything that can submit a request and hand back its future
pub trait Connection: Send + Sync {
    /// Submit a request.
    ///
    /// Fails immediately with `Submission` if the request cannot be sent.
    fn send(&self, request: &Request) -> Result<ResultFuture>;
}

impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn send(&self, request: &Request) -> Result<ResultFuture> {
        (**self).send(request)
    }
}

/// Requests waiting for a reply, keyed by message tag
type PendingMap = Arc<Mutex<HashMap<String, Fulfiller>>>;

/// A TCP connection to the group service
///
/// ## Concurrency:
/// - `writer`: Mutex, one frame on the wire at a time
/// - `pending`: Mutex, shared with the reader thread
/// - `closed`: set by the reader thread on EOF or error
pub struct TcpConnection {
    /// TCP stream writer (buffered for efficiency)
    writer: Mutex<BufWriter<TcpStream>>,

    /// Fulfillers for requests that have not been answered yet
    pending: PendingMap,

    /// Counter for message tags
    next_tag: AtomicU64,

    /// True once the reader thread has stopped
    closed: Arc<AtomicBool>,

    /// Reply routing thread
    reader_handle: Option<JoinHandle<()>>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpConnection {
    /// Connect to the address in `config`
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = config
            .server_addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                LinkError::Config(format!("Cannot resolve address: {}", config.server_addr))
            })?;

        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout())?;
        Self::from_stream(stream)
    }

    /// Wrap an already-connected stream and start the reply reader
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let reader_handle = {
            let pending = Arc::clone(&pending);
            let closed = Arc::clone(&closed);
            let peer = peer_addr.clone();
            thread::Builder::new()
                .name("grouplink-reader".to_string())
                .spawn(move || read_loop(BufReader::new(read_stream), pending, closed, peer))?
        };

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            writer: Mutex::new(BufWriter::new(stream)),
            pending,
            next_tag: AtomicU64::new(1),
            closed,
            reader_handle: Some(reader_handle),
            peer_addr,
        })
    }

    /// Whether the reader has seen the connection go away
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of requests still waiting for a reply
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn next_tag(&self) -> String {
        format!("g.{}", self.next_tag.fetch_add(1, Ordering::Relaxed))
    }
}

impl Connection for TcpConnection {
    fn send(&self, request: &Request) -> Result<ResultFuture> {
        if self.is_closed() {
            return Err(LinkError::Submission(format!(
                "connection to {} is closed",
                self.peer_addr
            )));
        }

        let body = encode_request(request)?;
        let tag = self.next_tag();
        let (fulfiller, future) = ResultFuture::pending(tag.clone());

        // Register before writing so a fast reply cannot beat us to the map
        self.pending.lock().insert(tag.clone(), fulfiller);

        // The reader may have drained the map between the check above and the insert
        if self.is_closed() {
            self.pending.lock().remove(&tag);
            return Err(LinkError::Submission(format!(
                "connection to {} is closed",
                self.peer_addr
            )));
        }

        let written = {
            let mut writer = self.writer.lock();
            write_frame(&mut *writer, &tag, &body)
        };

        if let Err(e) = written {
            self.pending.lock().remove(&tag);
            tracing::warn!("Failed to send {} to {}: {}", request.label(), self.peer_addr, e);
            return Err(LinkError::Submission(e.to_string()));
        }

        tracing::trace!("Sent {} as {} to {}", request.label(), tag, self.peer_addr);
        Ok(future)
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        let _ = self.writer.lock().get_ref().shutdown(Shutdown::Both);
        if let Some(handle) = self.reader_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Route every inbound frame to the future registered under its tag
fn read_loop(
    mut reader: BufReader<TcpStream>,
    pending: PendingMap,
    closed: Arc<AtomicBool>,
    peer_addr: String,
) {
    loop {
        let (tag, body) = match read_frame(&mut reader) {
            Ok(frame) => frame,
            Err(LinkError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Connection to {} closed", peer_addr);
                break;
            }
            Err(LinkError::Protocol(msg)) => {
                // Framing is lost after a bad frame; nothing after it can be trusted
                tracing::warn!("Bad frame from {}: {}", peer_addr, msg);
                break;
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", peer_addr, e);
                break;
            }
        };

        let fulfiller = pending.lock().remove(&tag);
        match fulfiller {
            Some(fulfiller) => {
                if !fulfiller.fulfill(body) {
                    tracing::debug!("Reply {} arrived after its caller gave up", tag);
                }
            }
            None => tracing::debug!("Dropping reply with unknown tag {} from {}", tag, peer_addr),
        }
    }

    closed.store(true, Ordering::Release);

    // Dropping the fulfillers wakes every waiter with Disconnected
    let orphaned = std::mem::take(&mut *pending.lock());
    if !orphaned.is_empty() {
        tracing::debug!("{} requests to {} left unanswered", orphaned.len(), peer_addr);
    }
}

fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::NotConnected
    )
}

use std::fmt;

use tracing::trace;

type ReleaseHook = Box<dyn FnOnce(usize) + Send>;

/// Byte sink receiving one response body.
///
/// A buffer is moved into exactly one [`QueryTask`](crate::task::QueryTask)
/// and released when the task reaches a terminal state. Release happens in
/// `Drop`, so it runs once whatever path the task took. The optional release
/// hook is called with the number of bytes held at that moment.
#[derive(Default)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    on_release: Option<ReleaseHook>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release_hook(hook: impl FnOnce(usize) + Send + 'static) -> Self {
        ResponseBuffer {
            data: Vec::new(),
            on_release: Some(Box::new(hook)),
        }
    }

    pub fn extend_from_slice(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Moves the bytes out and releases the buffer.
    pub fn into_bytes(mut self) -> Vec<u8> {
        let data = std::mem::take(&mut self.data);
        if let Some(hook) = self.on_release.take() {
            hook(data.len());
        }
        trace!("Released response buffer ({} bytes handed over)", data.len());
        data
    }
}

impl Drop for ResponseBuffer {
    fn drop(&mut self) {
        if let Some(hook) = self.on_release.take() {
            trace!("Released response buffer ({} bytes dropped)", self.data.len());
            hook(self.data.len());
        }
    }
}

impl fmt::Debug for ResponseBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ResponseBuffer")
            .field("len", &self.data.len())
            .field("hooked", &self.on_release.is_some())
            .finish()
    }
}

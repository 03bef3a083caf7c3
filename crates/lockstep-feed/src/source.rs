#![forbid(unsafe_code)]

//! The paginated fetch boundary.
//!
//! A [`PageSource`] yields one [`Page`] per call: the items plus the
//! server's pagination echo. The trait is synchronous and cooperative —
//! callers drive it from their update cycle, and transports that are really
//! asynchronous adapt behind the seam (block, poll a channel, replay a
//! fixture). The pager never sees the transport.

use thiserror::Error;

/// What the client asks for: a zero-based page and the page size it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// The server's view of the pagination state, echoed with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub pages_count: u32,
    pub total_count: u32,
}

/// One fetched page: the items and the pagination echo.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

/// Why a fetch failed. Recovered at the pager boundary, never propagated
/// into the container.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {message}")]
    Request { message: String },

    #[error("malformed page payload: {message}")]
    Payload { message: String },
}

impl FetchError {
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }
}

/// A source of pages. One page per call, in whatever order the caller asks.
pub trait PageSource<T> {
    /// Fetch the requested page.
    ///
    /// # Errors
    ///
    /// [`FetchError`] for transport failures or unusable payloads.
    fn fetch_page(&mut self, request: &PageRequest) -> Result<Page<T>, FetchError>;
}

impl<T, F> PageSource<T> for F
where
    F: FnMut(&PageRequest) -> Result<Page<T>, FetchError>,
{
    fn fetch_page(&mut self, request: &PageRequest) -> Result<Page<T>, FetchError> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_sources() {
        let mut source = |req: &PageRequest| {
            Ok(Page {
                items: vec![req.page],
                info: PageInfo {
                    page: req.page,
                    page_size: req.page_size,
                    pages_count: 5,
                    total_count: 15,
                },
            })
        };
        let page = source
            .fetch_page(&PageRequest {
                page: 2,
                page_size: 3,
            })
            .unwrap();
        assert_eq!(page.items, vec![2]);
        assert_eq!(page.info.pages_count, 5);
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::request("503 from upstream");
        assert_eq!(err.to_string(), "request failed: 503 from upstream");
        let err = FetchError::payload("missing items field");
        assert_eq!(err.to_string(), "malformed page payload: missing items field");
    }
}

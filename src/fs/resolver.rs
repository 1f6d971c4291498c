use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncSeek};

use crate::fs::listing::{self, DirEntry};
use crate::http::mime;
use crate::http::range::RangeError;

/// A random-access byte source. Blanket-implemented for files and cursors.
pub trait ByteSource: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> ByteSource for T {}

/// The bytes of a resolved resource.
pub enum ResourceBody {
    /// Seekable source of known length. Range requests are served from it.
    Seekable {
        source: Box<dyn ByteSource>,
        len: u64,
    },
    /// Content produced in memory, such as a directory listing. Not range-capable.
    Generated(Vec<u8>),
}

impl ResourceBody {
    /// The seekable source and its length, for serving a byte range.
    pub fn into_range_source(self) -> Result<(Box<dyn ByteSource>, u64), RangeError> {
        match self {
            ResourceBody::Seekable { source, len } => Ok((source, len)),
            ResourceBody::Generated(_) => Err(RangeError::Unsupported),
        }
    }
}

impl std::fmt::Debug for ResourceBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceBody::Seekable { len, .. } => {
                f.debug_struct("Seekable").field("len", len).finish()
            }
            ResourceBody::Generated(body) => {
                f.debug_tuple("Generated").field(&body.len()).finish()
            }
        }
    }
}

/// A resource handed to the connection for the duration of one request.
#[derive(Debug)]
pub struct Resource {
    pub body: ResourceBody,
    pub content_type: String,
}

impl Resource {
    pub fn seekable(
        source: impl ByteSource + 'static,
        len: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            body: ResourceBody::Seekable {
                source: Box::new(source),
                len,
            },
            content_type: content_type.into(),
        }
    }

    pub fn generated(body: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            body: ResourceBody::Generated(body),
            content_type: content_type.into(),
        }
    }
}

/// Maps a request path to a resource.
///
/// `Ok(None)` means the resource is absent (404). `Err` means the resource
/// exists but could not be produced (500).
pub trait ResourceResolver: Send + Sync + 'static {
    fn resolve(&self, path: &str) -> impl Future<Output = io::Result<Option<Resource>>> + Send;
}

/// Serves files and directory listings from a root directory.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem location for a request path. Never escapes the root.
    pub fn local_path(&self, request_path: &str) -> PathBuf {
        let clean = normalize_path(request_path);
        self.root.join(clean.trim_start_matches('/'))
    }

    async fn directory_listing(&self, dir: &Path, url_path: &str) -> io::Result<Resource> {
        let mut entries = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().await?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let page = listing::render(url_path, &entries);
        Ok(Resource::generated(page.into_bytes(), "text/html; charset=utf-8"))
    }
}

impl ResourceResolver for FileResolver {
    async fn resolve(&self, path: &str) -> io::Result<Option<Resource>> {
        let url_path = normalize_path(path);
        let full_path = self.local_path(path);

        let metadata = match tokio::fs::metadata(&full_path).await {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(path = %full_path.display(), error = %e, "Cannot stat path");
                return Ok(None);
            }
        };

        if metadata.is_dir() {
            return self.directory_listing(&full_path, &url_path).await.map(Some);
        }

        let file = match tokio::fs::File::open(&full_path).await {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(path = %full_path.display(), error = %e, "Cannot open file");
                return Ok(None);
            }
        };

        Ok(Some(Resource::seekable(
            file,
            metadata.len(),
            mime::from_path(&full_path),
        )))
    }
}

/// Lexically cleans a request path into a rooted `/`-separated path.
///
/// Empty and `.` segments are dropped; `..` removes the previous segment but
/// never climbs above the root.
///
/// ```
/// # use rangeserve::fs::resolver::normalize_path;
/// assert_eq!(normalize_path("/a/./b/../c"), "/a/c");
/// assert_eq!(normalize_path("/../../etc/passwd"), "/etc/passwd");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

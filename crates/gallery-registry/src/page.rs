//! # Pagination Engine
//!
//! Keyset pagination over the image collection. Pages are slices of a
//! total order on `(sort_key, id)`; the id tie-breaker guarantees a total
//! order even when the sort key has duplicate values, which keeps pages
//! stable across requests.
//!
//! The seek is by sort position, not numeric offset, so concurrent
//! insert/delete of unrelated records cannot shift page boundaries. No
//! snapshot isolation is assumed: a marker that disappears between
//! requests yields a `BadRequest`, and duplicate or missing entries
//! across pages are an accepted trade-off of keyset pagination without
//! transactions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use gallery_core::{Image, ImageId, RegistryError, RequestContext, Timestamp};

use crate::filter::FilterSet;
use crate::repo::ImageRepository;

/// Allowed sort keys for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Status,
    ContainerFormat,
    DiskFormat,
    Size,
    Id,
    CreatedAt,
    UpdatedAt,
}

impl SortKey {
    /// Parse a sort key from its query-parameter form.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BadRequest`] for keys outside the
    /// allow-list.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        match s {
            "name" => Ok(Self::Name),
            "status" => Ok(Self::Status),
            "container_format" => Ok(Self::ContainerFormat),
            "disk_format" => Ok(Self::DiskFormat),
            "size" => Ok(Self::Size),
            "id" => Ok(Self::Id),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            _ => Err(RegistryError::bad_request(format!(
                "unsupported sort_key '{s}'"
            ))),
        }
    }

    /// The query-parameter form of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::ContainerFormat => "container_format",
            Self::DiskFormat => "disk_format",
            Self::Size => "size",
            Self::Id => "id",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    /// Parse a direction from its query-parameter form.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::BadRequest`] for anything but `asc`/`desc`.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(RegistryError::bad_request(format!(
                "sort_dir must be 'asc' or 'desc', got '{s}'"
            ))),
        }
    }

    /// The query-parameter form of this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A validated page request.
///
/// Every field stays absent when the client did not specify it: the
/// engine falls back to defaults internally, and the serializer echoes
/// only what the client actually sent.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Id of the last entity the caller has seen.
    pub marker: Option<ImageId>,
    /// Requested page size; capped by [`PageConfig::max_limit`].
    pub limit: Option<u32>,
    pub sort_key: Option<SortKey>,
    pub sort_dir: Option<SortDir>,
}

impl PageRequest {
    /// The sort key applied when the client requests none.
    pub fn effective_sort_key(&self) -> SortKey {
        self.sort_key.unwrap_or(SortKey::CreatedAt)
    }

    /// The sort direction applied when the client requests none.
    pub fn effective_sort_dir(&self) -> SortDir {
        self.sort_dir.unwrap_or(SortDir::Desc)
    }
}

/// Engine limits, fixed at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size applied when the client requests none.
    pub default_limit: u32,
    /// Hard cap on any requested page size.
    pub max_limit: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_limit: 25,
            max_limit: 500,
        }
    }
}

/// One page of the ordered, filtered collection.
#[derive(Debug, Clone)]
pub struct Page {
    pub images: Vec<Image>,
    /// Present exactly when the page filled a non-zero effective limit,
    /// meaning more records might follow. Absent signals end of
    /// collection; the serializer must not render a null for it.
    pub next_marker: Option<ImageId>,
}

/// The sort value of a record under a given key. Variants never mix
/// within one comparison because both sides use the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Text(Option<String>),
    Number(Option<u64>),
    Time(Timestamp),
    Id(ImageId),
}

fn sort_value(image: &Image, key: SortKey) -> SortValue {
    match key {
        SortKey::Name => SortValue::Text(image.name.clone()),
        SortKey::Status => SortValue::Text(Some(image.status.as_str().to_string())),
        SortKey::ContainerFormat => SortValue::Text(image.container_format.clone()),
        SortKey::DiskFormat => SortValue::Text(image.disk_format.clone()),
        SortKey::Size => SortValue::Number(image.size),
        SortKey::Id => SortValue::Id(image.id),
        SortKey::CreatedAt => SortValue::Time(image.created_at),
        SortKey::UpdatedAt => SortValue::Time(image.updated_at),
    }
}

/// Total order on `(sort_key, id)`. `Desc` reverses both the primary key
/// and the tie-breaker.
fn compare(a: &Image, b: &Image, key: SortKey, dir: SortDir) -> Ordering {
    let ordering = sort_value(a, key)
        .cmp(&sort_value(b, key))
        .then_with(|| a.id.cmp(&b.id));
    match dir {
        SortDir::Asc => ordering,
        SortDir::Desc => ordering.reverse(),
    }
}

/// Produce one page of entities.
///
/// The marker lookup is a single repository `get`, which doubles as the
/// existence and visibility check; a missing or invisible marker is a
/// `BadRequest`, not a `NotFound`, because it is input validation rather
/// than missing-resource semantics. The seek then skips everything at or
/// before the marker's position in the total order, so it works even
/// when the current filters exclude the marker itself.
pub fn paginate(
    repo: &dyn ImageRepository,
    ctx: &RequestContext,
    filters: &FilterSet,
    request: &PageRequest,
    config: &PageConfig,
) -> Result<Page, RegistryError> {
    let limit = request
        .limit
        .unwrap_or(config.default_limit)
        .min(config.max_limit) as usize;
    let sort_key = request.effective_sort_key();
    let sort_dir = request.effective_sort_dir();

    let marker_image = match &request.marker {
        Some(id) => match repo.get(ctx, id) {
            Ok(image) => Some(image),
            Err(RegistryError::NotFound(_)) => {
                return Err(RegistryError::bad_request(format!("marker {id} not found")));
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    let mut images: Vec<Image> = repo
        .list(ctx, filters)?
        .into_iter()
        .filter(|image| filters.matches(image))
        .collect();
    images.sort_by(|a, b| compare(a, b, sort_key, sort_dir));

    let start = match &marker_image {
        Some(marker) => images
            .iter()
            .position(|image| compare(image, marker, sort_key, sort_dir) == Ordering::Greater)
            .unwrap_or(images.len()),
        None => 0,
    };

    let page: Vec<Image> = images.into_iter().skip(start).take(limit).collect();
    let next_marker = if limit > 0 && page.len() == limit {
        page.last().map(|image| image.id)
    } else {
        None
    };

    Ok(Page {
        images: page,
        next_marker,
    })
}

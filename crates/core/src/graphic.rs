//! Graphic registry: named image resources resolved once at startup.

use std::sync::Arc;

use thiserror::Error;

/// Opaque handle to a loaded image, issued by an [`ImageLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetLoadError {
    #[error("graphic resource not found: {path}")]
    NotFound { path: String },
    #[error("graphic resource {path} could not be read: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Resolves resource paths into image handles.
pub trait ImageLoader {
    fn load(&mut self, path: &str) -> Result<ImageHandle, AssetLoadError>;
}

/// A named graphic and, once loaded, its image handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicDescriptor {
    pub name: &'static str,
    pub path: &'static str,
    pub image: Option<ImageHandle>,
}

impl GraphicDescriptor {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            image: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

pub const ROAD_KOMA: GraphicDescriptor =
    GraphicDescriptor::new("ROAD_KOMA", "assets/image/road_koma.png");
pub const SETTLEMENT_KOMA: GraphicDescriptor =
    GraphicDescriptor::new("SETTLEMENT_KOMA", "assets/image/settlement_koma.png");
pub const TEST_TREASURE: GraphicDescriptor =
    GraphicDescriptor::new("TEST_TREASURE", "assets/image/test_treasure.png");

/// Every graphic the viewer needs.
pub const GRAPHIC_DATA: [GraphicDescriptor; 3] = [ROAD_KOMA, SETTLEMENT_KOMA, TEST_TREASURE];

/// Resolve `descriptor.path` and return a copy with the handle populated.
///
/// Calling this again on the same descriptor fetches the image again.
pub fn load_graphic(
    loader: &mut dyn ImageLoader,
    descriptor: GraphicDescriptor,
) -> Result<GraphicDescriptor, AssetLoadError> {
    let image = loader.load(descriptor.path)?;
    tracing::debug!(name = descriptor.name, path = descriptor.path, ?image, "graphic loaded");
    Ok(GraphicDescriptor {
        image: Some(image),
        ..descriptor
    })
}

/// Loaded graphics, shared with the drawables built from them.
#[derive(Debug, Clone)]
pub struct GraphicBook {
    pub road_koma: Arc<GraphicDescriptor>,
    pub settlement_koma: Arc<GraphicDescriptor>,
    pub test_treasure: Arc<GraphicDescriptor>,
}

impl GraphicBook {
    /// Load every entry of [`GRAPHIC_DATA`]. The first failure aborts.
    pub fn load(loader: &mut dyn ImageLoader) -> Result<Self, AssetLoadError> {
        Ok(Self {
            road_koma: Arc::new(load_graphic(loader, ROAD_KOMA)?),
            settlement_koma: Arc::new(load_graphic(loader, SETTLEMENT_KOMA)?),
            test_treasure: Arc::new(load_graphic(loader, TEST_TREASURE)?),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<GraphicDescriptor>> {
        self.iter().find(|g| g.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<GraphicDescriptor>> {
        [&self.road_koma, &self.settlement_koma, &self.test_treasure].into_iter()
    }
}

/// Loader that hands out sequential handles for a fixed set of paths.
///
/// Useful for headless runs and tests; paths outside the set fail with
/// [`AssetLoadError::NotFound`].
#[derive(Debug, Clone, Default)]
pub struct StaticImageLoader {
    known: Vec<&'static str>,
    loads: u32,
}

impl StaticImageLoader {
    pub fn new(known: &[&'static str]) -> Self {
        Self {
            known: known.to_vec(),
            loads: 0,
        }
    }

    /// Loader that knows every path in [`GRAPHIC_DATA`].
    pub fn with_graphic_data() -> Self {
        let paths: Vec<&'static str> = GRAPHIC_DATA.iter().map(|g| g.path).collect();
        Self::new(&paths)
    }

    /// Number of successful loads so far.
    pub fn loads(&self) -> u32 {
        self.loads
    }
}

impl ImageLoader for StaticImageLoader {
    fn load(&mut self, path: &str) -> Result<ImageHandle, AssetLoadError> {
        let Some(idx) = self.known.iter().position(|p| *p == path) else {
            return Err(AssetLoadError::NotFound {
                path: path.to_string(),
            });
        };
        self.loads += 1;
        Ok(ImageHandle(idx as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_populates_handle_without_touching_identity() {
        let mut loader = StaticImageLoader::with_graphic_data();
        let loaded = load_graphic(&mut loader, SETTLEMENT_KOMA).unwrap();
        assert_eq!(loaded.name, "SETTLEMENT_KOMA");
        assert_eq!(loaded.path, SETTLEMENT_KOMA.path);
        assert_eq!(loaded.image, Some(ImageHandle(1)));
        assert!(!SETTLEMENT_KOMA.is_loaded());
    }

    #[test]
    fn reloading_fetches_again() {
        let mut loader = StaticImageLoader::with_graphic_data();
        let once = load_graphic(&mut loader, ROAD_KOMA).unwrap();
        let twice = load_graphic(&mut loader, once.clone()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(loader.loads(), 2);
    }

    #[test]
    fn book_load_fails_on_unresolvable_path() {
        let mut loader = StaticImageLoader::new(&[ROAD_KOMA.path]);
        let err = GraphicBook::load(&mut loader).unwrap_err();
        assert_eq!(
            err,
            AssetLoadError::NotFound {
                path: SETTLEMENT_KOMA.path.to_string()
            }
        );
    }

    #[test]
    fn book_lookup_by_name() {
        let mut loader = StaticImageLoader::with_graphic_data();
        let book = GraphicBook::load(&mut loader).unwrap();
        assert!(book.iter().all(|g| g.is_loaded()));
        assert_eq!(book.get("TEST_TREASURE").unwrap().image, Some(ImageHandle(2)));
        assert!(book.get("CASTLE").is_none());
    }
}

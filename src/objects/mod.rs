//! Non-graphical objects (OBJECTS section)
//!
//! Every object is keyed by its own handle into a [`Catalog`]. Objects are
//! decoded from one record each; cross-object links stay as handles and are
//! followed by the resolver.

use ahash::AHashMap;

use crate::types::Handle;

mod background;
mod color_book;
mod data_link;
mod dictionary;
mod dictionary_variable;
mod geodata;
mod image_definition;
mod light_list;
mod material;
mod plot_settings;
mod point_cloud;
mod proxy;
mod section;
mod spatial_filter;
mod sun;
mod underlay_definition;
mod xrecord;

pub use background::{Background, BackgroundKind, BackgroundSubclass};
pub use color_book::{BookColor, ColorBook};
pub use data_link::DataLink;
pub use dictionary::{Dictionary, DictionaryEntry};
pub use dictionary_variable::DictionaryVariable;
pub use geodata::{GeoData, GeoLocation};
pub use image_definition::{ImageDefinition, ImageDefinitionReactor, RasterVariables};
pub use light_list::LightList;
pub use material::Material;
pub use plot_settings::{Layout, PlotInfrastructure, PlotSettings};
pub use point_cloud::{PointCloudDefinition, PointCloudReactor};
pub use proxy::{ProxyObject, ProxyPayload};
pub use section::{
    DetailViewObject, SectionGeometry, SectionObject, ViewStyle, ViewStyleKind,
};
pub use spatial_filter::SpatialFilter;
pub use sun::Sun;
pub use underlay_definition::{UnderlayDefinition, UnderlayKind};
pub use xrecord::XRecord;

/// Anything stored in a catalog
pub trait ObjectRecord {
    /// The object's own handle
    fn handle(&self) -> Option<Handle>;
}

macro_rules! impl_object_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::objects::ObjectRecord for $ty {
                fn handle(&self) -> Option<$crate::types::Handle> { self.handle }
            }
        )*
    };
}

impl_object_record!(
    Background, BookColor, DataLink, Dictionary, DictionaryVariable, GeoData, ImageDefinition,
    ImageDefinitionReactor, RasterVariables, LightList, Material, Layout, PlotSettings,
    PointCloudDefinition, PointCloudReactor, ProxyObject, DetailViewObject, SectionGeometry,
    SectionObject, ViewStyle, SpatialFilter, Sun, UnderlayDefinition, XRecord,
);

/// Ordered list of records with a handle index
///
/// Records without a handle are listed but not indexed. A second record
/// with the same handle replaces the first in the index (last write wins);
/// both stay in `list`.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    list: Vec<T>,
    by_handle: AHashMap<Handle, usize>,
}

impl<T: ObjectRecord> Catalog<T> {
    pub fn new() -> Self {
        Catalog {
            list: Vec::new(),
            by_handle: AHashMap::new(),
        }
    }

    /// Add a record; returns true when its handle was already indexed
    pub fn insert(&mut self, record: T) -> bool {
        let index = self.list.len();
        let replaced = match record.handle() {
            Some(h) => self.by_handle.insert(h, index).is_some(),
            None => false,
        };
        self.list.push(record);
        replaced
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.by_handle.get(&handle).and_then(|&i| self.list.get(i))
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.by_handle.contains_key(&handle)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<T: ObjectRecord> Default for Catalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Catalog<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

/// Handle-indexed catalogs from the single auxiliary-object pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxiliaryObjects {
    pub dictionaries: Catalog<Dictionary>,
    pub xrecords: Catalog<XRecord>,
    pub spatial_filters: Catalog<SpatialFilter>,
    pub image_definitions: Catalog<ImageDefinition>,
    pub image_reactors: Catalog<ImageDefinitionReactor>,
    pub raster_variables: Catalog<RasterVariables>,
    pub underlay_definitions: Catalog<UnderlayDefinition>,
    pub point_cloud_definitions: Catalog<PointCloudDefinition>,
    pub point_cloud_reactors: Catalog<PointCloudReactor>,
    pub view_styles: Catalog<ViewStyle>,
    pub section_objects: Catalog<SectionObject>,
    pub section_geometries: Catalog<SectionGeometry>,
    pub detail_view_objects: Catalog<DetailViewObject>,
    pub proxy_objects: Catalog<ProxyObject>,
    pub data_links: Catalog<DataLink>,
    pub dictionary_variables: Catalog<DictionaryVariable>,
    pub light_lists: Catalog<LightList>,
}

impl AuxiliaryObjects {
    /// Total number of decoded objects
    pub fn len(&self) -> usize {
        self.dictionaries.len()
            + self.xrecords.len()
            + self.spatial_filters.len()
            + self.image_definitions.len()
            + self.image_reactors.len()
            + self.raster_variables.len()
            + self.underlay_definitions.len()
            + self.point_cloud_definitions.len()
            + self.point_cloud_reactors.len()
            + self.view_styles.len()
            + self.section_objects.len()
            + self.section_geometries.len()
            + self.detail_view_objects.len()
            + self.proxy_objects.len()
            + self.data_links.len()
            + self.dictionary_variables.len()
            + self.light_lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary(handle: u64, name: &str) -> Dictionary {
        Dictionary {
            handle: Some(Handle::new(handle)),
            entries: vec![DictionaryEntry {
                name: name.to_string(),
                handle: Handle::new(0x99),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_last_write_wins() {
        let mut catalog = Catalog::new();
        assert!(!catalog.insert(dictionary(0xC, "first")));
        assert!(catalog.insert(dictionary(0xC, "second")));
        assert_eq!(catalog.len(), 2);
        let found = catalog.get(Handle::new(0xC)).expect("indexed");
        assert_eq!(found.entries[0].name, "second");
    }

    #[test]
    fn test_catalog_without_handle() {
        let mut catalog = Catalog::new();
        catalog.insert(Dictionary::default());
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(Handle::NULL));
    }
}

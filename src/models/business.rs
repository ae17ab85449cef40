//! Business listing model.
//!
//! Every optional field has a defined type and default at construction;
//! nothing is patched in at read time.

use serde::Serialize;

/// Listing kind; doubles as the public list route segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessKind {
    /// 동네맛집
    Food,
    /// 가전수리
    Repair,
}

impl BusinessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessKind::Food => "food",
            BusinessKind::Repair => "repair",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "food" => Some(BusinessKind::Food),
            "repair" => Some(BusinessKind::Repair),
            _ => None,
        }
    }
}

/// A (sido, sigungu, dong) location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionTriple {
    pub sido: String,
    pub sigungu: String,
    pub dong: String,
}

/// One of up to three highlighted menu entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub price: String,
}

/// One of up to three highlighted service entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceItem {
    pub name: String,
    pub description: String,
    pub price: String,
}

/// Mon..Sun operating-hour strings plus the off-day note.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperatingHours {
    pub mon: Option<String>,
    pub tue: Option<String>,
    pub wed: Option<String>,
    pub thu: Option<String>,
    pub fri: Option<String>,
    pub sat: Option<String>,
    pub sun: Option<String>,
    pub off_day: Option<String>,
}

/// Amenity checkboxes on the listing form.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FeatureFlags {
    pub delivery: bool,
    pub reservation: bool,
    pub parking: bool,
    pub pet: bool,
    pub wifi: bool,
    pub group: bool,
}

/// Owner-editable listing fields, as collected from the register/edit form.
#[derive(Debug, Clone)]
pub struct BusinessDraft {
    pub kind: BusinessKind,
    pub region: RegionTriple,
    pub category: String,
    pub name: String,
    pub description: String,
    pub phone: Option<String>,
    pub homepage: Option<String>,
    pub blog: Option<String>,
    pub instagram: Option<String>,
    pub address_road: Option<String>,
    pub address_detail: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub hours: OperatingHours,
    pub features: FeatureFlags,
    pub menus: Vec<MenuItem>,
    pub services: Vec<ServiceItem>,
    pub image_url: Option<String>,
}

/// A registered business listing.
#[derive(Debug, Clone, Serialize)]
pub struct Business {
    pub id: i64,
    pub kind: BusinessKind,
    #[serde(flatten)]
    pub region: RegionTriple,
    pub category: String,
    pub name: String,
    pub description: String,
    pub phone: Option<String>,
    pub homepage: Option<String>,
    pub blog: Option<String>,
    pub instagram: Option<String>,
    pub address_road: Option<String>,
    pub address_detail: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub hours: OperatingHours,
    pub features: FeatureFlags,
    pub menus: Vec<MenuItem>,
    pub services: Vec<ServiceItem>,
    pub owner: String,
    pub approved: bool,
    pub paid: bool,
    pub image_url: Option<String>,
}

impl Business {
    /// Materialize a draft under the given id and owner.
    pub fn from_draft(id: i64, owner: &str, approved: bool, draft: BusinessDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            region: draft.region,
            category: draft.category,
            name: draft.name,
            description: draft.description,
            phone: draft.phone,
            homepage: draft.homepage,
            blog: draft.blog,
            instagram: draft.instagram,
            address_road: draft.address_road,
            address_detail: draft.address_detail,
            lat: draft.lat,
            lng: draft.lng,
            hours: draft.hours,
            features: draft.features,
            menus: draft.menus,
            services: draft.services,
            owner: owner.to_string(),
            approved,
            paid: false,
            image_url: draft.image_url,
        }
    }

    /// Replace the mutable fields from an edit, keeping id, owner, approval
    /// and paid state. The stored image survives when the edit carries none.
    pub fn apply_draft(&mut self, draft: BusinessDraft) {
        self.kind = draft.kind;
        self.region = draft.region;
        self.category = draft.category;
        self.name = draft.name;
        self.description = draft.description;
        self.phone = draft.phone;
        self.homepage = draft.homepage;
        self.blog = draft.blog;
        self.instagram = draft.instagram;
        self.address_road = draft.address_road;
        self.address_detail = draft.address_detail;
        self.lat = draft.lat;
        self.lng = draft.lng;
        self.hours = draft.hours;
        self.features = draft.features;
        self.menus = draft.menus;
        self.services = draft.services;
        if draft.image_url.is_some() {
            self.image_url = draft.image_url;
        }
    }
}

//! Closed vocabularies sent by the backend as plain strings.
//!
//! Each enum keeps an `Unknown` variant carrying the raw value so codes the
//! backend adds later survive a round trip through this service.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ExceptionReason
// ---------------------------------------------------------------------------

/// Why a visit was recorded outside the shop geofence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExceptionReason {
    GpsDrift,
    ShopMoved,
    RoadBlocked,
    AlternateLocation,
    CustomerRequestedOutside,
    LowGpsAccuracy,
    Other,
    Unknown(String),
}

impl ExceptionReason {
    pub fn as_str(&self) -> &str {
        match self {
            ExceptionReason::GpsDrift => "gps_drift",
            ExceptionReason::ShopMoved => "shop_moved",
            ExceptionReason::RoadBlocked => "road_blocked",
            ExceptionReason::AlternateLocation => "alternate_location",
            ExceptionReason::CustomerRequestedOutside => "customer_requested_outside",
            ExceptionReason::LowGpsAccuracy => "low_gps_accuracy",
            ExceptionReason::Other => "other",
            ExceptionReason::Unknown(s) => s.as_str(),
        }
    }

    /// Human readable label
    pub fn label(&self) -> &str {
        match self {
            ExceptionReason::GpsDrift => "GPS drift",
            ExceptionReason::ShopMoved => "Shop moved",
            ExceptionReason::RoadBlocked => "Road blocked",
            ExceptionReason::AlternateLocation => "Alternate location",
            ExceptionReason::CustomerRequestedOutside => "Customer requested outside",
            ExceptionReason::LowGpsAccuracy => "Low GPS accuracy",
            ExceptionReason::Other => "Other",
            ExceptionReason::Unknown(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for ExceptionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for ExceptionReason {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gps_drift" => ExceptionReason::GpsDrift,
            "shop_moved" => ExceptionReason::ShopMoved,
            "road_blocked" => ExceptionReason::RoadBlocked,
            "alternate_location" => ExceptionReason::AlternateLocation,
            "customer_requested_outside" => ExceptionReason::CustomerRequestedOutside,
            "low_gps_accuracy" => ExceptionReason::LowGpsAccuracy,
            "other" => ExceptionReason::Other,
            _ => ExceptionReason::Unknown(s.to_string()),
        }
    }
}

impl From<String> for ExceptionReason {
    fn from(s: String) -> Self {
        ExceptionReason::from(s.as_str())
    }
}

impl From<ExceptionReason> for String {
    fn from(r: ExceptionReason) -> Self {
        match r {
            ExceptionReason::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// StaffRole
// ---------------------------------------------------------------------------

/// Role of a company user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StaffRole {
    Owner,
    Admin,
    Manager,
    Rep,
    Warehouse,
    Unknown(String),
}

impl StaffRole {
    pub fn as_str(&self) -> &str {
        match self {
            StaffRole::Owner => "owner",
            StaffRole::Admin => "admin",
            StaffRole::Manager => "manager",
            StaffRole::Rep => "rep",
            StaffRole::Warehouse => "warehouse",
            StaffRole::Unknown(s) => s.as_str(),
        }
    }

    /// Roles allowed to approve or flag visit exceptions
    pub fn can_review_visits(&self) -> bool {
        matches!(self, StaffRole::Owner | StaffRole::Admin | StaffRole::Manager)
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for StaffRole {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "owner" => StaffRole::Owner,
            "admin" => StaffRole::Admin,
            "manager" => StaffRole::Manager,
            "rep" => StaffRole::Rep,
            "warehouse" => StaffRole::Warehouse,
            _ => StaffRole::Unknown(s),
        }
    }
}

impl From<StaffRole> for String {
    fn from(r: StaffRole) -> Self {
        match r {
            StaffRole::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// FlagKind
// ---------------------------------------------------------------------------

/// Weekly behavioural flag raised against a rep
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlagKind {
    HighExceptionRate,
    FrequentFarStarts,
    RepeatedCoordinates,
    Unknown(String),
}

impl FlagKind {
    pub fn as_str(&self) -> &str {
        match self {
            FlagKind::HighExceptionRate => "high_exception_rate",
            FlagKind::FrequentFarStarts => "frequent_far_starts",
            FlagKind::RepeatedCoordinates => "repeated_coordinates",
            FlagKind::Unknown(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for FlagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for FlagKind {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high_exception_rate" => FlagKind::HighExceptionRate,
            "frequent_far_starts" => FlagKind::FrequentFarStarts,
            "repeated_coordinates" => FlagKind::RepeatedCoordinates,
            _ => FlagKind::Unknown(s),
        }
    }
}

impl From<FlagKind> for String {
    fn from(k: FlagKind) -> Self {
        match k {
            FlagKind::Unknown(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

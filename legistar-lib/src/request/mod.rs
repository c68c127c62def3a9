//! Request construction
//!
//! Every Legistar call carries the partner credential, most carry the
//! government being queried, and many take a nested options structure with
//! service-required defaults. The builder here assembles all of that into a
//! [`CallDescriptor`] that a transport can send.

pub mod builder;
pub mod call;

pub use builder::{CallBuilder, ParamValue, RequestBuilder};
pub use call::{CallDescriptor, Param};

/// Parameter carrying the partner credential token
pub const PARTNER_PARAM: &str = "PartnerGUID";
/// Parameter carrying the selected government
pub const GOVERNMENT_PARAM: &str = "GovernmentGUID";
/// Parameter carrying the nested options structure
pub const OPTIONS_PARAM: &str = "Options";
/// Options default: return every language
pub const DEFAULT_LANGUAGE: &str = "LanguageAll";
/// Options default: no GUID formatting
pub const DEFAULT_FORMAT_GUID: &str = "No";

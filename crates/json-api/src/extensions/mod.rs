//! Extension traits

mod as_of;
mod depot;
mod result;

pub(crate) use as_of::AsOfExt as _;
pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;

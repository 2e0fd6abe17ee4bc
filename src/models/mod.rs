mod click;
mod link;

pub use click::Click;
pub use link::{
    CreateLinkRequest, Link, LinkOverview, LinkOverviewResponse, LinkResponse, NewLink,
};

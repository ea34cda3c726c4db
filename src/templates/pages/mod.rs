pub mod dashboard;
pub mod home;
pub mod properties;

pub use dashboard::{dashboard_page, DashboardVm};
pub use home::home_page;
pub use properties::{properties_page, PropertiesVm};

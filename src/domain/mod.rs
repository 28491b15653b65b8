pub mod content;
pub mod diff;
pub mod mock_config;
pub mod model;

pub mod mock_store;
pub mod model_watcher;

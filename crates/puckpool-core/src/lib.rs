// Library root: the pool domain shared by the proxy server and the terminal
// client (seasons, participants, picks, ranking, export/import, storage).

pub mod config_files;
pub mod db;
pub mod model;
pub mod pool;
pub mod ranking;
pub mod season;
pub mod transfer;

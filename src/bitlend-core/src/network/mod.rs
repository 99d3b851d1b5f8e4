pub mod root_key;

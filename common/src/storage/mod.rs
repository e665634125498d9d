pub mod reply_store;

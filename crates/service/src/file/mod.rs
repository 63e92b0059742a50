pub mod beer_store;

// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod epd2in13g;
pub mod pihole_client;
pub mod preview_display;

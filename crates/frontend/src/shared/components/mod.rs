pub mod data_table;
pub mod notice_banner;
pub mod pagination_controls;
pub mod search_input;
pub mod stat_card;

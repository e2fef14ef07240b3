mod byte_order_tests;
mod format_tests;
mod wkb_tests;

pub mod order_reference;

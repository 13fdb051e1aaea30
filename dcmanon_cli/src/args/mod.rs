pub mod action_table_args;

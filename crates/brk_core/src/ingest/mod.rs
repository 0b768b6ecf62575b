pub mod break_csv;

pub mod update_spy_classifier;

pub mod cutting_pipeline;

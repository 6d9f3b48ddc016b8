use crate::analytics::TendencyEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: TendencyEngine,
}

impl AppState {
    pub fn new(engine: TendencyEngine) -> Self {
        Self { engine }
    }
}

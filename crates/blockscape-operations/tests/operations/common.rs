use async_trait::async_trait;
use blockscape_core::{thread_safe_rw, BlockId, EventBus, OperationError};
use blockscape_operations::{Entity, EntityRef, Operation, OperationManager, OperationManagerConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct TestBlock {
    pub id: BlockId,
    pub disposed: bool,
}

impl Entity for TestBlock {
    fn id(&self) -> BlockId {
        self.id
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}

pub fn block(id: u64) -> EntityRef<TestBlock> {
    thread_safe_rw(TestBlock {
        id: BlockId(id),
        disposed: false,
    })
}

pub fn manager() -> OperationManager {
    OperationManager::spawn(OperationManagerConfig::default(), Arc::new(EventBus::new()))
}

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// Writes `start`/`end` journal lines around an optional sleep.
pub struct Step {
    pub name: String,
    pub delay: Duration,
    pub fail: bool,
    pub journal: Journal,
}

impl Step {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            fail: false,
            journal: journal.clone(),
        }
    }

    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn log(&self, line: String) {
        self.journal.lock().unwrap().push(line);
    }
}

#[async_trait]
impl Operation for Step {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        self.log(format!("start {}", self.name));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(OperationError::failed(&self.name, "step refused"));
        }
        self.log(format!("end {}", self.name));
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log(format!("undo {}", self.name));
        Ok(())
    }
}

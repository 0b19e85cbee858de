//! Deferred tasks (reload timer, ragdoll delay)
//!
//! Одноразовые таймеры на общей fixed timeline. Задача либо срабатывает ровно один раз,
//! либо отменяется по handle — отменённая задача никогда не выполняется.
//!
//! Scheduler не вызывает callbacks сам: `tick_task_scheduler` превращает сработавшие
//! задачи в события, а доменные системы проверяют актуальность (generation token).

use bevy::prelude::*;

use crate::logger;

/// Handle запланированной задачи (монотонно растущий id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// Что должно произойти по таймеру
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Reload duration истёк (generation = поколение WeaponInstance на момент старта)
    ReloadComplete { owner: Entity, generation: u64 },
    /// Death animation доиграла — включаем ragdoll
    EnableRagdoll { entity: Entity },
}

#[derive(Debug, Clone)]
struct PendingTask {
    handle: TaskHandle,
    remaining: f32,
    task: ScheduledTask,
}

/// Очередь отложенных задач
#[derive(Resource, Debug, Default)]
pub struct TaskScheduler {
    pending: Vec<PendingTask>,
    next_handle: u64,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запланировать задачу через `delay` секунд simulation time
    pub fn schedule(&mut self, delay: f32, task: ScheduledTask) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(PendingTask {
            handle,
            remaining: delay.max(0.0),
            task,
        });
        handle
    }

    /// Отменить задачу. `false` если её уже нет (сработала или отменена раньше).
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|pending| pending.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Продвинуть время на `dt`, вернуть сработавшие задачи в порядке планирования
    pub fn advance(&mut self, dt: f32) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        self.pending.retain_mut(|pending| {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                due.push(pending.task);
                false
            } else {
                true
            }
        });
        due
    }
}

// ============================================================================
// Events
// ============================================================================

/// Событие: reload timer истёк
#[derive(Event, Debug, Clone, Copy)]
pub struct ReloadTimerElapsed {
    pub owner: Entity,
    pub generation: u64,
}

/// Событие: ragdoll delay истёк
#[derive(Event, Debug, Clone, Copy)]
pub struct RagdollTimerElapsed {
    pub entity: Entity,
}

/// Система: тик scheduler'а (FixedUpdate)
pub fn tick_task_scheduler(
    time: Res<Time<Fixed>>,
    mut scheduler: ResMut<TaskScheduler>,
    mut reload_events: EventWriter<ReloadTimerElapsed>,
    mut ragdoll_events: EventWriter<RagdollTimerElapsed>,
) {
    if scheduler.is_empty() {
        return;
    }

    for task in scheduler.advance(time.delta_secs()) {
        match task {
            ScheduledTask::ReloadComplete { owner, generation } => {
                reload_events.write(ReloadTimerElapsed { owner, generation });
            }
            ScheduledTask::EnableRagdoll { entity } => {
                ragdoll_events.write(RagdollTimerElapsed { entity });
            }
        }
        logger::log(&format!("⏰ Scheduled task fired: {:?}", task));
    }
}

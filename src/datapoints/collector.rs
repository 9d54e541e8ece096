//! The cooperative main loop: scheduler ticks, engine reads, cache updates.

use crate::datapoints::config::PollConfig;
use crate::datapoints::data::{Descriptor, Group};
use crate::datapoints::registry::Registry;
use crate::datapoints::scheduler::{Millis, PollScheduler};
use crate::datapoints::snapshot::Snapshot;
use crate::error::Result;
use crate::protocol::ProtocolEngine;
use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Sole owner of the registry, scheduler and protocol engine.
///
/// Cells are written only from [`DatapointCollector::step`] and read only when
/// rendering, both on the collector's own task, so no locking is involved.
pub struct DatapointCollector {
    registry: Registry,
    scheduler: PollScheduler,
    engine: Box<dyn ProtocolEngine>,
    config: PollConfig,
}

impl DatapointCollector {
    /// Create a collector over a populated registry.
    pub fn new(
        registry: Registry,
        config: PollConfig,
        engine: impl ProtocolEngine + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: PollScheduler::from_config(&config),
            registry,
            engine: Box::new(engine),
            config,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Render the current snapshot document.
    pub fn render(&self) -> Result<String> {
        Snapshot::new(&self.registry).render()
    }

    /// Ask the engine to read `group`. A refused read leaves the cache stale
    /// until the group is next due.
    fn read_group(&mut self, group: Group) {
        let members: Vec<&Descriptor> = self.registry.group(group).collect();
        if members.is_empty() {
            return;
        }
        if let Err(err) = self.engine.read_group(group, &members) {
            warn!("Failed to read {} group: {}", group, err);
        }
    }

    /// Feed every telegram the engine has ready into the cache.
    ///
    /// Returns the number of cells written.
    fn drain(&mut self) -> usize {
        let mut written = 0;
        while let Some(telegram) = self.engine.poll_decoded() {
            written += self.registry.deliver(telegram.address, telegram.value);
        }
        written
    }

    /// Run one loop iteration at clock reading `now`.
    ///
    /// Returns the re-rendered document when any cell changed.
    pub fn step(&mut self, now: Millis) -> Result<Option<String>> {
        for group in self.scheduler.tick(now) {
            info!("Polling {} group", group);
            self.read_group(group);
        }

        if self.drain() == 0 {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// Read every group once, regardless of schedule, and render the result.
    pub fn poll_all(&mut self) -> Result<String> {
        for group in Group::ALL {
            self.read_group(group);
        }
        self.drain();
        self.render()
    }

    /// Drive the loop on a timer, yielding a document whenever the cache changes.
    ///
    /// The first item is the document as it stands before any read.
    pub fn start_stream(self) -> Result<BoxStream<'static, String>> {
        let initial = self.render()?;
        let start = Instant::now() + self.config.startup_delay;
        let mut ticker = time::interval_at(start, self.config.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Polling {} datapoints after {:?} (fast {:?}, slow {:?})",
            self.registry.len(),
            self.config.startup_delay,
            self.config.fast_interval,
            self.config.slow_interval
        );

        let updates = stream::unfold(
            (self, ticker, Instant::now()),
            |(mut collector, mut ticker, epoch)| async move {
                loop {
                    ticker.tick().await;
                    // wraps after ~49 days, which the scheduler tolerates
                    let now = epoch.elapsed().as_millis() as Millis;
                    match collector.step(now) {
                        Ok(Some(document)) => return Some((document, (collector, ticker, epoch))),
                        Ok(None) => {}
                        Err(err) => error!("Failed to render snapshot: {}", err),
                    }
                }
            },
        );

        Ok(stream::once(async move { initial }).chain(updates).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoints::data::{DecodingKind, Telegram};
    use crate::protocol::SimulatedEngine;
    use std::time::Duration;

    /// Engine that answers every read with fixed values.
    #[derive(Default)]
    struct FixedEngine {
        reads: Vec<Group>,
        pending: Vec<Telegram>,
        values: Vec<Telegram>,
    }

    impl ProtocolEngine for FixedEngine {
        fn read_group(&mut self, group: Group, datapoints: &[&Descriptor]) -> Result<()> {
            self.reads.push(group);
            for descriptor in datapoints {
                if let Some(t) = self.values.iter().find(|t| t.address == descriptor.address) {
                    self.pending.push(*t);
                }
            }
            Ok(())
        }

        fn poll_decoded(&mut self) -> Option<Telegram> {
            self.pending.pop()
        }
    }

    fn registry() -> Registry {
        Registry::from_descriptors([
            Descriptor::new("Temp", Group::Fast, 0x0810, DecodingKind::Temperature),
            Descriptor::new("Count", Group::Slow, 0x088A, DecodingKind::Counter),
        ])
        .unwrap()
    }

    fn config() -> PollConfig {
        PollConfig::default()
            .with_fast_interval(Duration::from_millis(5))
            .with_slow_interval(Duration::from_millis(50))
            .with_startup_delay(Duration::ZERO)
            .with_tick(Duration::from_millis(1))
    }

    #[test]
    fn test_step_polls_due_groups_and_renders() {
        let engine = FixedEngine {
            values: vec![Telegram::new(0x0810, 2543), Telegram::new(0x088A, 17)],
            ..Default::default()
        };
        let mut collector = DatapointCollector::new(registry(), config(), engine).unwrap();

        let document = collector.step(0).unwrap().expect("first tick reads both groups");
        assert_eq!(
            document,
            r#"{"Temp":254.3,"Count":17,"href":{"update":"/update"}}"#
        );

        // nothing due, nothing decoded
        assert_eq!(collector.step(1).unwrap(), None);
        // fast group due again, same values re-rendered
        assert!(collector.step(5).unwrap().is_some());
    }

    #[test]
    fn test_unsolicited_telegrams_do_not_touch_cache() {
        let engine = SimulatedEngine::new().with_unsolicited(0xBEEF);
        let mut collector = DatapointCollector::new(registry(), config(), engine).unwrap();
        collector.step(0).unwrap();
        assert_eq!(collector.registry().populated(), 2);
        assert!(!collector.render().unwrap().contains("BEEF"));
    }

    #[test]
    fn test_offline_engine_keeps_valid_document() {
        let engine = SimulatedEngine::new().with_offline(true);
        let mut collector = DatapointCollector::new(registry(), config(), engine).unwrap();
        assert_eq!(collector.step(0).unwrap(), None);
        assert_eq!(
            collector.render().unwrap(),
            r#"{"href":{"update":"/update"}}"#
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = config().with_fast_interval(Duration::ZERO);
        assert!(DatapointCollector::new(registry(), bad, SimulatedEngine::new()).is_err());
    }

    #[test]
    fn test_poll_all_populates_every_group() {
        let mut collector =
            DatapointCollector::new(registry(), config(), SimulatedEngine::new()).unwrap();
        let document = collector.poll_all().unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert!(value.get("Temp").is_some());
        assert!(value.get("Count").is_some());
    }

    #[tokio::test]
    async fn test_stream_yields_initial_then_populated_document() {
        let collector =
            DatapointCollector::new(registry(), config(), SimulatedEngine::new()).unwrap();
        let mut stream = collector.start_stream().unwrap();

        let initial = stream.next().await.unwrap();
        assert_eq!(initial, r#"{"href":{"update":"/update"}}"#);

        let populated = time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("collector should publish after first tick")
            .unwrap();
        assert!(populated.starts_with(r#"{"Temp":"#));
    }

    #[test]
    fn test_stream_initial_document_without_runtime_polling() {
        let collector =
            DatapointCollector::new(registry(), config(), SimulatedEngine::new()).unwrap();
        let initial = tokio_test::block_on(async {
            let mut stream = collector.start_stream().unwrap();
            stream.next().await
        });
        assert_eq!(initial.as_deref(), Some(r#"{"href":{"update":"/update"}}"#));
    }
}

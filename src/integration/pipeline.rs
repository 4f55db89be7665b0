//! PresencePipeline for combining detection and depth with presence tracking.

use crate::config::PresenceSettings;
use crate::error::{ConfigError, PipelineError};
use crate::tracker::{FrameProcessor, FrameResult, TrackerConfig};

use super::{Clock, CountReporter, DepthSource, DetectionSource, MonotonicClock};

/// A combined tracker that bundles a detector and a depth sensor with the
/// presence tracker.
///
/// One call to [`process_frame`](Self::process_frame) runs detection, reads
/// the distance grid, timestamps the frame and updates the tracker.
pub struct PresencePipeline<D: DetectionSource, P: DepthSource, C: Clock = MonotonicClock> {
    detector: D,
    depth: P,
    clock: C,
    processor: FrameProcessor,
    reporter: CountReporter,
}

impl<D: DetectionSource, P: DepthSource> PresencePipeline<D, P, MonotonicClock> {
    /// Create a new pipeline timed by the wall clock.
    pub fn new(detector: D, depth: P, config: TrackerConfig) -> Result<Self, ConfigError> {
        Self::with_clock(detector, depth, MonotonicClock::new(), config)
    }
}

impl<D: DetectionSource, P: DepthSource, C: Clock> PresencePipeline<D, P, C> {
    /// Create a new pipeline with an explicit clock.
    pub fn with_clock(
        detector: D,
        depth: P,
        clock: C,
        config: TrackerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            depth,
            clock,
            processor: FrameProcessor::new(config)?,
            reporter: CountReporter::default(),
        })
    }

    /// Create a pipeline with tracker limits and report interval from `settings`.
    pub fn from_settings(
        detector: D,
        depth: P,
        clock: C,
        settings: &PresenceSettings,
    ) -> Result<Self, ConfigError> {
        let config = settings.tracker_config()?;
        let reporter = CountReporter::new(settings.report_interval()?);
        Ok(Self::with_clock(detector, depth, clock, config)?.with_reporter(reporter))
    }

    /// Replace the count reporter, e.g. to change its interval.
    pub fn with_reporter(mut self, reporter: CountReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Process a single frame.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Returns
    /// The tracker state after this frame, or the collaborator error that
    /// prevented it. A failed frame leaves the tracker untouched.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameResult, PipelineError<D::Error, P::Error>> {
        let detections = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        let grid = self.depth.distance_grid().map_err(PipelineError::Depth)?;
        let now = self.clock.now();

        let result = self.processor.process_frame(&detections, &grid, now);
        self.reporter.observe(now, result.total_count);
        Ok(result)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a mutable reference to the underlying depth source.
    pub fn depth_mut(&mut self) -> &mut P {
        &mut self.depth
    }

    pub fn reporter(&self) -> &CountReporter {
        &self.reporter
    }

    /// Get a reference to the underlying frame processor.
    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::SteppedClock;
    use crate::tracker::{Detection, DistanceGrid, TransitionKind};
    use std::time::Duration;

    struct MockDetector {
        detections: Vec<Detection>,
    }

    impl DetectionSource for MockDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Detection>, Self::Error> {
            Ok(self.detections.clone())
        }
    }

    struct MockDepth {
        distance: i32,
        fail: bool,
    }

    impl DepthSource for MockDepth {
        type Error = &'static str;

        fn distance_grid(&mut self) -> Result<DistanceGrid, Self::Error> {
            if self.fail {
                return Err("sensor unplugged");
            }
            Ok(DistanceGrid::filled(160, 120, self.distance))
        }
    }

    fn collaborators(distance: i32) -> (MockDetector, MockDepth, SteppedClock) {
        let detector = MockDetector {
            detections: vec![Detection::new(100.0, 100.0, 40.0, 40.0)],
        };
        let depth = MockDepth {
            distance,
            fail: false,
        };
        let clock = SteppedClock::new(Duration::ZERO, Duration::from_millis(100));
        (detector, depth, clock)
    }

    fn pipeline(distance: i32) -> PresencePipeline<MockDetector, MockDepth, SteppedClock> {
        let (detector, depth, clock) = collaborators(distance);
        PresencePipeline::with_clock(detector, depth, clock, TrackerConfig::default()).unwrap()
    }

    #[test]
    fn test_presence_pipeline() {
        let mut pipeline = pipeline(1000);

        let first = pipeline.process_frame(&[], 640, 480).unwrap();
        assert_eq!(first.transitions_of(TransitionKind::Admitted).count(), 1);

        // Frames at 100ms steps: 2100ms is the first past the 2s dwell.
        let mut promoted_at = None;
        for frame in 1..=25 {
            let result = pipeline.process_frame(&[], 640, 480).unwrap();
            if result.transitions_of(TransitionKind::Promoted).count() > 0 {
                promoted_at = Some(frame);
                break;
            }
        }
        assert_eq!(promoted_at, Some(21));
        assert_eq!(pipeline.processor().registry().confirmed().len(), 1);
    }

    #[test]
    fn test_settings_reach_tracker_and_reporter() {
        let json = r#"{ "min_dist": 1200, "max_dist": 2500, "report_interval_secs": 0.25 }"#;
        let settings = PresenceSettings::from_json_str(json).unwrap();
        let (detector, depth, clock) = collaborators(1000);
        let mut pipeline =
            PresencePipeline::from_settings(detector, depth, clock, &settings).unwrap();

        assert_eq!(pipeline.reporter().interval(), Duration::from_millis(250));
        assert_eq!(pipeline.processor().config().min_dist, 1200);

        // 1000mm is now closer than the configured band.
        let result = pipeline.process_frame(&[], 640, 480).unwrap();
        assert!(result.provisional.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = PresenceSettings {
            report_interval_secs: f64::NAN,
            ..PresenceSettings::default()
        };
        let (detector, depth, clock) = collaborators(1000);
        assert!(matches!(
            PresencePipeline::from_settings(detector, depth, clock, &settings),
            Err(ConfigError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_out_of_range_never_tracked() {
        let mut pipeline = pipeline(3000);
        for _ in 0..50 {
            let result = pipeline.process_frame(&[], 640, 480).unwrap();
            assert!(result.provisional.is_empty());
            assert!(result.confirmed.is_empty());
        }
    }

    #[test]
    fn test_depth_failure_leaves_tracker_untouched() {
        let mut pipeline = pipeline(1000);
        pipeline.depth_mut().fail = true;

        let err = pipeline.process_frame(&[], 640, 480).unwrap_err();
        assert!(matches!(err, PipelineError::Depth("sensor unplugged")));
        assert!(pipeline.processor().registry().is_empty());
    }
}

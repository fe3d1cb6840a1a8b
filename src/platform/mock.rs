//! Scripted platform used by the tests.
//!
//! Every acquisition and release is counted on a shared `Recorder` so tests
//! can assert that resources are released on every exit path.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use crossbeam_channel::Sender;
use glam::Vec3;

use super::*;
use crate::projection::ViewTransform;

/// Counts of everything the mocks have handed out and taken back
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recorder {
    pub probes: usize,
    pub graphics_created: usize,
    pub sessions_started: usize,
    pub sessions_ended: usize,
    pub hit_sources: usize,
    pub frames_delivered: usize,
    pub transparent_clears: usize,
    pub streams_opened: usize,
    pub streams_stopped: usize,
    pub subscriptions: usize,
    pub unsubscriptions: usize,
    /// Highest number of hardware resources held at the same time
    pub peak_resources: usize,
}

impl Recorder {
    pub fn resources_held(&self) -> usize {
        (self.sessions_started - self.sessions_ended) + (self.streams_opened - self.streams_stopped)
    }

    fn note_acquire(&mut self) {
        self.peak_resources = self.peak_resources.max(self.resources_held());
    }
}

pub type SharedRecorder = Rc<RefCell<Recorder>>;

/// One scripted XR frame
#[derive(Debug, Clone)]
pub struct MockFrame {
    pub view: Option<ViewTransform>,
    pub hits: Vec<Vec3>,
}

impl MockFrame {
    pub fn hit(view: ViewTransform, point: Vec3) -> Self {
        Self {
            view: Some(view),
            hits: vec![point],
        }
    }

    pub fn miss(view: ViewTransform) -> Self {
        Self {
            view: Some(view),
            hits: Vec::new(),
        }
    }
}

/// Frames still to be delivered; an exhausted queue means the platform ended the session
pub type FrameScript = Rc<RefCell<VecDeque<MockFrame>>>;

/// How a scripted XR step should behave
#[derive(Debug, Clone)]
pub enum XrScript {
    Succeed,
    FailSession(PlatformError),
    FailHitTestSource(PlatformError),
}

pub struct MockXr {
    pub probe: CapabilityProbe,
    pub script: XrScript,
    pub frames: FrameScript,
    pub recorder: SharedRecorder,
}

#[async_trait(?Send)]
impl XrRuntime for MockXr {
    async fn probe_immersive_ar(&self) -> CapabilityProbe {
        self.recorder.borrow_mut().probes += 1;
        self.probe
    }

    async fn create_graphics(&self) -> Result<Box<dyn XrGraphics>, PlatformError> {
        self.recorder.borrow_mut().graphics_created += 1;
        Ok(Box::new(MockGraphics {
            recorder: self.recorder.clone(),
        }))
    }

    async fn request_session(
        &self,
        request: &XrSessionRequest,
    ) -> Result<Box<dyn XrSession>, PlatformError> {
        assert!(request.required_features.contains(&XrFeature::HitTest));
        if let XrScript::FailSession(err) = &self.script {
            return Err(err.clone());
        }
        {
            let mut rec = self.recorder.borrow_mut();
            rec.sessions_started += 1;
            rec.note_acquire();
        }
        Ok(Box::new(MockSession {
            script: self.script.clone(),
            frames: self.frames.clone(),
            recorder: self.recorder.clone(),
            ended: false,
            next_space: 0,
        }))
    }
}

struct MockGraphics {
    recorder: SharedRecorder,
}

#[async_trait(?Send)]
impl XrGraphics for MockGraphics {
    async fn make_xr_compatible(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn clear_transparent(&mut self) {
        self.recorder.borrow_mut().transparent_clears += 1;
    }
}

struct MockSession {
    script: XrScript,
    frames: FrameScript,
    recorder: SharedRecorder,
    ended: bool,
    next_space: u32,
}

impl MockSession {
    fn mark_ended(&mut self) {
        if !self.ended {
            self.ended = true;
            self.recorder.borrow_mut().sessions_ended += 1;
        }
    }
}

#[async_trait(?Send)]
impl XrSession for MockSession {
    fn attach_base_layer(
        &mut self,
        _graphics: &mut dyn XrGraphics,
        config: BaseLayerConfig,
    ) -> Result<(), PlatformError> {
        assert!(config.alpha);
        Ok(())
    }

    async fn request_reference_space(
        &mut self,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpace, PlatformError> {
        self.next_space += 1;
        Ok(ReferenceSpace {
            id: self.next_space,
            kind,
        })
    }

    async fn request_hit_test_source(
        &mut self,
        space: ReferenceSpace,
    ) -> Result<HitTestSource, PlatformError> {
        assert_eq!(space.kind, ReferenceSpaceKind::Viewer);
        if let XrScript::FailHitTestSource(err) = &self.script {
            return Err(err.clone());
        }
        self.recorder.borrow_mut().hit_sources += 1;
        Ok(HitTestSource { id: 1 })
    }

    async fn next_frame(&mut self) -> Option<Box<dyn XrFrame>> {
        if self.ended {
            return None;
        }
        let next = self.frames.borrow_mut().pop_front();
        match next {
            Some(frame) => {
                self.recorder.borrow_mut().frames_delivered += 1;
                Some(Box::new(frame) as Box<dyn XrFrame>)
            }
            None => {
                self.mark_ended();
                None
            }
        }
    }

    fn end(&mut self) -> Result<(), PlatformError> {
        self.mark_ended();
        Ok(())
    }
}

struct MockHit(Vec3);

impl HitTestResult for MockHit {
    fn pose(&self, space: ReferenceSpace) -> Option<Pose> {
        (space.kind == ReferenceSpaceKind::Local).then(|| Pose::at(self.0))
    }
}

impl XrFrame for MockFrame {
    fn viewer_pose(&self, space: ReferenceSpace) -> Option<ViewerPose> {
        assert_eq!(space.kind, ReferenceSpaceKind::Local);
        self.view.map(|view| ViewerPose { views: vec![view] })
    }

    fn hit_test_results(&self, _source: HitTestSource) -> Vec<Box<dyn HitTestResult + '_>> {
        let mut results: Vec<Box<dyn HitTestResult + '_>> = Vec::new();
        for point in &self.hits {
            results.push(Box::new(MockHit(*point)));
        }
        results
    }
}

pub struct MockCamera {
    pub result: Result<(u32, u32), PlatformError>,
    pub recorder: SharedRecorder,
}

#[async_trait(?Send)]
impl CameraProvider for MockCamera {
    async fn open_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, PlatformError> {
        assert!(!constraints.audio);
        let (width, height) = self.result.clone()?;
        {
            let mut rec = self.recorder.borrow_mut();
            rec.streams_opened += 1;
            rec.note_acquire();
        }
        Ok(Box::new(MockStream {
            frame: VideoFrame::solid(width, height, [0, 0, 255, 255]),
            live: true,
            recorder: self.recorder.clone(),
        }))
    }
}

struct MockStream {
    frame: VideoFrame,
    live: bool,
    recorder: SharedRecorder,
}

impl CameraStream for MockStream {
    fn latest_frame(&self) -> Option<VideoFrame> {
        self.live.then(|| self.frame.clone())
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.recorder.borrow_mut().streams_stopped += 1;
        }
    }
}

/// Orientation sensor whose events are pushed by the test
pub struct MockOrientation {
    pub available: bool,
    pub sender: Rc<RefCell<Option<Sender<OrientationReading>>>>,
    pub recorder: SharedRecorder,
}

impl OrientationSensor for MockOrientation {
    fn subscribe(&self) -> Result<SensorSubscription, PlatformError> {
        if !self.available {
            return Err(PlatformError::NotSupported("orientation".to_string()));
        }
        let (tx, rx) = crossbeam_channel::unbounded();
        *self.sender.borrow_mut() = Some(tx);
        self.recorder.borrow_mut().subscriptions += 1;

        let recorder = self.recorder.clone();
        let sender = self.sender.clone();
        Ok(SensorSubscription::new(rx, move || {
            sender.borrow_mut().take();
            recorder.borrow_mut().unsubscriptions += 1;
        }))
    }
}

/// Downloader that keeps every file in memory
#[derive(Default)]
pub struct MockDownloader {
    pub files: RefCell<Vec<(String, String, Vec<u8>)>>,
}

impl Downloader for MockDownloader {
    fn download(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), PlatformError> {
        self.files.borrow_mut().push((
            file_name.to_string(),
            content_type.to_string(),
            bytes.to_vec(),
        ));
        Ok(())
    }
}

/// Builder for a complete scripted platform
pub struct MockPlatform {
    pub probe: CapabilityProbe,
    pub xr_script: XrScript,
    pub camera: Result<(u32, u32), PlatformError>,
    pub orientation: bool,
    pub frames: FrameScript,
    pub sensor: Rc<RefCell<Option<Sender<OrientationReading>>>>,
    pub recorder: SharedRecorder,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            probe: CapabilityProbe::Unsupported,
            xr_script: XrScript::Succeed,
            camera: Ok((64, 48)),
            orientation: true,
            frames: Rc::new(RefCell::new(VecDeque::new())),
            sensor: Rc::new(RefCell::new(None)),
            recorder: Rc::new(RefCell::new(Recorder::default())),
        }
    }
}

impl MockPlatform {
    pub fn services(&self) -> PlatformServices {
        PlatformServices::new(
            Box::new(MockXr {
                probe: self.probe,
                script: self.xr_script.clone(),
                frames: self.frames.clone(),
                recorder: self.recorder.clone(),
            }),
            Box::new(MockCamera {
                result: self.camera.clone(),
                recorder: self.recorder.clone(),
            }),
            Box::new(MockOrientation {
                available: self.orientation,
                sender: self.sensor.clone(),
                recorder: self.recorder.clone(),
            }),
        )
    }

    pub fn push_frame(&self, frame: MockFrame) {
        self.frames.borrow_mut().push_back(frame);
    }

    /// Send an orientation event to the current subscriber, if any
    pub fn tilt(&self, beta: f32, gamma: f32) -> bool {
        match self.sensor.borrow().as_ref() {
            Some(tx) => tx
                .send(OrientationReading {
                    beta: Some(beta),
                    gamma: Some(gamma),
                })
                .is_ok(),
            None => false,
        }
    }

    pub fn recorded(&self) -> Recorder {
        self.recorder.borrow().clone()
    }
}

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The user (or platform) refused camera/microphone access.
    #[error("camera/microphone access denied: {0}")]
    PermissionDenied(String),
    #[error("capture device unavailable: {0}")]
    Unavailable(String),
}

/// Source of local capture tracks. Injected so a front end can plug in a
/// real device backend and tests can script grants and denials.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn open(&self) -> Result<LocalMedia, MediaError>;
}

/// An opened capture session: the local tracks under a shared stream id,
/// plus the pump keeping them fed. The device stays open until `close`.
#[derive(Debug)]
pub struct LocalMedia {
    stream_id: String,
    tracks: Vec<Arc<TrackLocalStaticSample>>,
    pump: Option<JoinHandle<()>>,
}

impl LocalMedia {
    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn tracks(&self) -> impl Iterator<Item = Arc<dyn TrackLocal + Send + Sync>> + '_ {
        self.tracks
            .iter()
            .map(|track| track.clone() as Arc<dyn TrackLocal + Send + Sync>)
    }

    /// Stop capture and release the tracks.
    pub fn close(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

impl Drop for LocalMedia {
    fn drop(&mut self) {
        self.close();
    }
}

const STREAM_ID: &str = "local-media";
const AUDIO_FRAME: Duration = Duration::from_millis(20);
const VIDEO_FRAME: Duration = Duration::from_millis(33);

// One 20 ms Opus silence frame.
static OPUS_SILENCE: [u8; 3] = [0xf8, 0xff, 0xfe];
static BLANK_FRAME: [u8; 128] = [0; 128];

/// Synthetic capture: silence on the audio track, blank payloads on the
/// video track. Keeps the media path real without touching OS devices.
pub struct SyntheticDevices;

#[async_trait]
impl MediaDevices for SyntheticDevices {
    async fn open(&self) -> Result<LocalMedia, MediaError> {
        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48_000,
                channels: 2,
                sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                rtcp_feedback: vec![],
            },
            "audio".to_owned(),
            STREAM_ID.to_owned(),
        ));
        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90_000,
                channels: 0,
                sdp_fmtp_line: String::new(),
                rtcp_feedback: vec![],
            },
            "video".to_owned(),
            STREAM_ID.to_owned(),
        ));

        let pump = tokio::spawn(pump_samples(audio.clone(), video.clone()));

        Ok(LocalMedia {
            stream_id: STREAM_ID.to_owned(),
            tracks: vec![audio, video],
            pump: Some(pump),
        })
    }
}

/// `write_sample` drops samples until negotiation binds the tracks, so the
/// pump starts immediately and simply keeps ticking for the session.
async fn pump_samples(audio: Arc<TrackLocalStaticSample>, video: Arc<TrackLocalStaticSample>) {
    let silence = Bytes::from_static(&OPUS_SILENCE);
    let blank = Bytes::from_static(&BLANK_FRAME);
    let mut audio_tick = tokio::time::interval(AUDIO_FRAME);
    let mut video_tick = tokio::time::interval(VIDEO_FRAME);

    loop {
        tokio::select! {
            _ = audio_tick.tick() => {
                let sample = Sample {
                    data: silence.clone(),
                    duration: AUDIO_FRAME,
                    ..Default::default()
                };
                if audio.write_sample(&sample).await.is_err() {
                    break;
                }
            }
            _ = video_tick.tick() => {
                let sample = Sample {
                    data: blank.clone(),
                    duration: VIDEO_FRAME,
                    ..Default::default()
                };
                if video.write_sample(&sample).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Always refuses, standing in for a dismissed permission prompt.
pub struct DeniedDevices;

#[async_trait]
impl MediaDevices for DeniedDevices {
    async fn open(&self) -> Result<LocalMedia, MediaError> {
        Err(MediaError::PermissionDenied(
            "permission prompt dismissed".to_owned(),
        ))
    }
}

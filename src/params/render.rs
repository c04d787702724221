//! Rendering, scene layout and recording configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Focal length as a fraction of the short viewport side over tan(fov/2)
    pub focal_scale: f32,

    /// Smallest camera-space depth allowed before projection (world units)
    pub near_depth: f32,

    /// Projection centre as a fraction of the viewport (x, y)
    pub center_fraction: (f32, f32),

    /// Clear colour behind the scene (sRGB)
    pub background: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 50.0,
            focal_scale: 0.92,
            near_depth: 0.05,
            center_fraction: (0.5, 0.58), // Sit the tank slightly below centre
            background: [11, 19, 32],
        }
    }
}

/// Vertical placement of the water body and seabed
#[derive(Debug, Clone)]
pub struct SceneLayout {
    /// Depth of the water column above the seabed (meters)
    pub water_depth_m: f64,

    /// Thickness of the seabed box (meters)
    pub seabed_thickness_m: f64,

    /// Multiplier on vertical distances when converting to world units
    pub vertical_exaggeration: f64,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            water_depth_m: 20_000.0,
            seabed_thickness_m: 4_000.0,
            vertical_exaggeration: 1.0,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 30,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Path of a single numbered frame
    pub fn frame_path(&self, frame_num: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), frame_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_paths() {
        let mut config = RecordingConfig::new(2.0);
        config.output_dir = "out".to_string();

        assert_eq!(config.total_frames(), 60);
        assert_eq!(config.frames_dir(), "out/frames");
        assert_eq!(config.frame_path(7), "out/frames/frame_00007.png");
    }
}

use crate::foundation::error::PfpResult;

/// Bundled background track, relative to the asset root.
pub const AMBIENT_TRACK_SOURCE: &str = "music/background-music.mp3";

/// Playback volume of the background track.
pub const AMBIENT_TRACK_VOLUME: f32 = 0.3;

/// Host audio element driven by [`AmbientTrack`].
pub trait AudioOutput {
    /// Apply volume and loop settings before the first play.
    fn configure(&mut self, source: &str, volume: f32, looping: bool);
    /// Start or resume playback. Hosts may refuse (autoplay policy, missing file).
    fn play(&mut self) -> PfpResult<()>;
    /// Pause playback, keeping the position.
    fn pause(&mut self);
}

/// On/off state of the optional background music plus its one-shot prompt.
#[derive(Debug)]
pub struct AmbientTrack<O: AudioOutput> {
    output: O,
    playing: bool,
    prompt_visible: bool,
}

impl<O: AudioOutput> AmbientTrack<O> {
    /// Wrap `output`, configuring it for the looping background track.
    pub fn new(mut output: O) -> Self {
        output.configure(AMBIENT_TRACK_SOURCE, AMBIENT_TRACK_VOLUME, true);
        Self {
            output,
            playing: false,
            prompt_visible: true,
        }
    }

    /// Whether the toggle currently reads "on".
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the "want some music?" prompt is still shown.
    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    /// Hide the prompt without touching playback.
    pub fn dismiss_prompt(&mut self) {
        self.prompt_visible = false;
    }

    /// Flip playback and return the new state.
    ///
    /// A refused `play` is logged and otherwise ignored; the toggle still reads "on".
    pub fn toggle(&mut self) -> bool {
        self.prompt_visible = false;
        if self.playing {
            self.output.pause();
            self.playing = false;
        } else {
            if let Err(e) = self.output.play() {
                tracing::warn!(error = %e, "background music failed to start");
            }
            self.playing = true;
        }
        tracing::debug!(playing = self.playing, "ambient track toggled");
        self.playing
    }

    /// Borrow the underlying output.
    pub fn output(&self) -> &O {
        &self.output
    }
}

/// Output that accepts every call and plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn configure(&mut self, _source: &str, _volume: f32, _looping: bool) {}

    fn play(&mut self) -> PfpResult<()> {
        Ok(())
    }

    fn pause(&mut self) {}
}

#[cfg(test)]
#[path = "../../tests/unit/audio/ambient.rs"]
mod tests;

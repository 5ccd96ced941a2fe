use anyhow::{anyhow, Context, Result};
use handheld_asteroids_core::Keys;

/// Scripted input: each step holds a key set for a number of frames.
///
/// Text form, one step per line:
///
/// ```text
/// # comment
/// 30              # idle for 30 frames
/// 1 START
/// 45 UP A
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputScript {
    steps: Vec<(u32, Keys)>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let count = tokens
                .next()
                .ok_or_else(|| anyhow!("line {line_no}: missing frame count"))?;
            let frames = count
                .parse::<u32>()
                .with_context(|| format!("line {line_no}: invalid frame count: {count}"))?;

            let mut keys = Keys::empty();
            for name in tokens {
                keys |= Keys::from_script_name(name)
                    .ok_or_else(|| anyhow!("line {line_no}: unknown key: {name}"))?;
            }
            steps.push((frames, keys));
        }
        Ok(Self { steps })
    }

    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|&(frames, _)| frames as u64).sum()
    }

    /// One key sample per frame.
    pub fn frames(&self) -> impl Iterator<Item = Keys> + '_ {
        self.steps
            .iter()
            .flat_map(|&(frames, keys)| std::iter::repeat(keys).take(frames as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_expand() {
        let script = InputScript::parse("# start a game\n2\n1 start\n\n3 up A  # thrust and fire\n").unwrap();
        assert_eq!(script.total_frames(), 6);
        let frames: Vec<_> = script.frames().collect();
        assert_eq!(
            frames,
            vec![
                Keys::empty(),
                Keys::empty(),
                Keys::START,
                Keys::UP | Keys::A,
                Keys::UP | Keys::A,
                Keys::UP | Keys::A,
            ]
        );
    }

    #[test]
    fn test_errors_name_the_line() {
        let err = InputScript::parse("1 A\nx B\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = InputScript::parse("1 A\n2 TURBO\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown key: TURBO");
    }
}

//! 实验结果.

use crate::profile::Profile;
use iris_berry::FeatureVector;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Succeeded: {}", p.get_succeeded())?;
    writeln!(w, "{S4}Failed: {}", p.get_failed())?;
    writeln!(w, "{S4}Without occlusion: {}", p.get_lash_missing())?;
    writeln!(w, "{S4}Total time: {} us", p.get_run_time_us())?;
    writeln!(w, "{S4}Most time-consuming task costs {} us", p.get_most_us())?;
    match p.get_avg_features() {
        Some(avg) => {
            write!(w, "{S4}Average features:")?;
            for (name, v) in FeatureVector::NAMES.iter().zip(avg) {
                write!(w, "\n{S4}{S4}{name:<6} {v:.6}")?;
            }
        }
        None => write!(w, "{S4}Average features: /")?,
    }
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(String, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (String, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut buf).unwrap();
            println!("{}", std::str::from_utf8(&buf).unwrap());
            buf.clear();

            utils::sep();
        }
    }
}

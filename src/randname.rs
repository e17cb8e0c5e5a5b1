//! Generates candidate environment names for `tmp` environments.
//!
//! Tries, in order: the EFF short word list (downloaded and cached on first
//! use), the system dictionary, then increasingly desperate random-letter
//! fallbacks. See <https://www.eff.org/dice> for background on the word
//! list.

use rand::seq::SliceRandom;
use std::io::{self, BufRead};

use crate::paths::HostPath;
use crate::somehow::{somehow as anyhow, Context, Result};

pub struct RandomNameGenerator {
    cache_dir: HostPath,
}

const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

impl RandomNameGenerator {
    pub fn new(cache_dir: HostPath) -> Self {
        Self { cache_dir }
    }

    /// Returns a random word accepted by `filter`, trying each source in
    /// turn until one succeeds.
    pub fn random_name<F>(&self, filter: F) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        fn from_lines<F>(lines: &[String], max_len: usize, filter: &F) -> Option<String>
        where
            F: Fn(&str) -> bool,
        {
            let mut rng = rand::thread_rng();
            for _ in 0..200 {
                let line = lines.choose(&mut rng)?;
                for word in line.split_ascii_whitespace() {
                    if word.len() <= max_len
                        && word.chars().all(|c| c.is_ascii_lowercase())
                        && filter(word)
                    {
                        return Some(word.to_owned());
                    }
                }
            }
            None
        }

        match self.eff_word_list().and_then(|lines| {
            from_lines(&lines, 10, &filter).ok_or_else(|| anyhow!("found no suitable word"))
        }) {
            Ok(word) => return Ok(word),
            Err(e) => println!("WARNING: failed to extract word from EFF word list: {e}"),
        }

        match dict_words().and_then(|lines| {
            from_lines(&lines, 6, &filter).ok_or_else(|| anyhow!("found no suitable word"))
        }) {
            Ok(word) => return Ok(word),
            Err(e) => {
                println!("WARNING: failed to extract word from /usr/share/dict/words: {e}")
            }
        }

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let word = std::iter::repeat_with(|| *ALPHABET.choose(&mut rng).unwrap())
                .take(6)
                .collect::<String>();
            if filter(&word) {
                return Ok(word);
            }
        }

        let word = std::iter::repeat_with(|| *ALPHABET.choose(&mut rng).unwrap())
            .take(32)
            .collect::<String>();
        if filter(&word) {
            return Ok(word);
        }

        Err(anyhow!(
            "failed to generate a suitable random name with any strategy"
        ))
    }

    fn eff_word_list(&self) -> Result<Vec<String>> {
        let path = self.cache_dir.join("eff_short_wordlist_1.txt");
        let contents = match std::fs::read_to_string(path.as_host_raw()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                println!("Downloading EFF short word list");
                let url = "https://www.eff.org/files/2016/09/08/eff_short_wordlist_1.txt";
                let body = reqwest::blocking::get(url)
                    .with_context(|| format!("failed to fetch word list from {url}"))?
                    .text()
                    .with_context(|| format!("failed to read word list body from {url}"))?;
                std::fs::create_dir_all(self.cache_dir.as_host_raw()).with_context(|| {
                    format!("failed to create cache directory: {}", self.cache_dir)
                })?;
                std::fs::write(path.as_host_raw(), &body)
                    .with_context(|| format!("failed to write word list cache: {path}"))?;
                body
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read word list cache: {path}"))
            }
        };
        Ok(contents.lines().map(str::to_owned).collect())
    }
}

fn dict_words() -> Result<Vec<String>> {
    let file = std::fs::File::open("/usr/share/dict/words")
        .context("failed to open /usr/share/dict/words")?;
    io::BufReader::new(file)
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read /usr/share/dict/words")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_name_falls_back_to_random_letters() {
        let dir = tempfile::tempdir().unwrap();
        let cache = HostPath::try_from(dir.path().to_path_buf()).unwrap();
        let gen = RandomNameGenerator::new(cache);
        // No network access and no dict file in the test sandbox: both
        // file-backed sources fail and the random-letters fallback kicks in.
        let name = gen.random_name(|w| w.len() == 6).unwrap();
        assert_eq!(6, name.len());
        assert!(name.chars().all(|c| c.is_ascii_lowercase()));
    }
}

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use prime_sieve::{
    Error, Mode,
    endings::{ENDING_DIGITS, EndingDigits, PAIR_DIGITS},
    hazmat::Sieve,
    parse_count,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prime-sieve", about = "Prime number generation with the Sieve of Eratosthenes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write primes to a new file, one per line.
    Generate {
        /// The inclusive limit (`--mode lt`) or the number of primes (`--mode first`).
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Output file. It must not exist yet.
        output: PathBuf,
        /// `lt` for every prime up to and including VALUE, `first` for the first VALUE primes.
        #[arg(long, default_value_t = Mode::LessThan)]
        mode: Mode,
        /// Threads used to mark composites (requires the `multicore` feature).
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
    /// Report the distribution of the last digits of primes read from a file.
    Endings {
        /// A file written by `generate`.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            value,
            output,
            mode,
            threads,
        } => {
            let elapsed = run_generate(&value, &output, mode, threads)?;
            println!("Complete! Generation took {elapsed:.5} seconds.");
        }
        Commands::Endings { input } => run_endings(&input)?,
    }

    Ok(())
}

fn make_sieve(value: u64, mode: Mode, threads: usize) -> Result<Sieve, Error> {
    #[cfg(feature = "multicore")]
    if threads > 1 {
        return prime_sieve::multicore::generate_primes(value, mode, threads);
    }
    #[cfg(not(feature = "multicore"))]
    if threads > 1 {
        tracing::warn!("Built without the `multicore` feature, ignoring --threads {threads}");
    }
    prime_sieve::generate_primes(value, mode)
}

fn header(value: u64, mode: Mode) -> String {
    match mode {
        Mode::LessThan => format!("Primes less than or equal to {value}"),
        Mode::First => format!("First {value} primes"),
    }
}

/// Generates the primes into a new file and returns the generation time in seconds.
fn run_generate(value: &str, output: &Path, mode: Mode, threads: usize) -> Result<f64> {
    if output.as_os_str().to_string_lossy().trim().is_empty() {
        bail!("Cannot use an empty file name");
    }
    let value = parse_count(value).with_context(|| format!("invalid value {value:?}"))?;

    let mut primes = make_sieve(value, mode, threads).context("failed to sieve")?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(output)
        .with_context(|| format!("cannot create {} (existing files are never overwritten)", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_primes(&mut writer, &header(value, mode), &mut primes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    writer.flush()?;

    Ok(primes.elapsed_secs().unwrap_or_default())
}

/// Writes a `#` header line, then one prime per line. Returns the number of primes written.
fn write_primes(writer: &mut impl Write, header: &str, primes: impl Iterator<Item = u64>) -> io::Result<u64> {
    writeln!(writer, "# {header}")?;
    let mut count = 0;
    for prime in primes {
        writeln!(writer, "{prime}")?;
        count += 1;
    }
    Ok(count)
}

/// Reads primes written by [`write_primes`], skipping comments and blank lines.
fn read_primes(reader: impl BufRead) -> Result<Vec<u64>> {
    let mut primes = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let prime = line
            .parse::<u64>()
            .with_context(|| format!("invalid prime {line:?} on line {}", idx + 1))?;
        primes.push(prime);
    }
    Ok(primes)
}

fn run_endings(input: &Path) -> Result<()> {
    let reader = BufReader::new(File::open(input).with_context(|| format!("failed to open {}", input.display()))?);
    let primes = read_primes(reader)?;
    if primes.is_empty() {
        bail!("{} does not contain any primes", input.display());
    }

    let stats = EndingDigits::from_primes(primes);
    print!("{}", format_endings(&stats));
    Ok(())
}

fn format_endings(stats: &EndingDigits) -> String {
    let mut out = format!("\n  Digit Distribution ({} primes)\n", stats.total());
    out.push_str("  Digit  Percentage\n");
    for digit in ENDING_DIGITS {
        out.push_str(&format!("  {digit:>5}  {:>9.3}%\n", stats.digit_fraction(digit) * 100.));
    }

    out.push_str(&format!("\n  Pair Distribution ({} pairs)\n", stats.pair_total()));
    out.push_str("     ");
    for digit in PAIR_DIGITS {
        out.push_str(&format!(" {digit:>8}"));
    }
    out.push('\n');
    for first in PAIR_DIGITS {
        out.push_str(&format!("  {first:>2} "));
        for second in PAIR_DIGITS {
            out.push_str(&format!(" {:>7.3}%", stats.pair_fraction(first, second) * 100.));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use prime_sieve::{Mode, endings::EndingDigits, first_primes};

    use super::{format_endings, header, read_primes, run_generate, write_primes};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("prime-sieve-{}-{name}", std::process::id()))
    }

    #[test]
    fn written_primes_can_be_read_back() {
        let mut buffer = Vec::new();
        let count = write_primes(&mut buffer, &header(5, Mode::First), first_primes(5).unwrap()).unwrap();
        assert_eq!(count, 5);
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "# First 5 primes\n2\n3\n5\n7\n11\n");
        assert_eq!(read_primes(Cursor::new(buffer)).unwrap(), [2, 3, 5, 7, 11]);
    }

    #[test]
    fn read_rejects_garbage() {
        let err = read_primes(Cursor::new("# header\n2\nthree\n")).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn headers() {
        assert_eq!(header(10, Mode::LessThan), "Primes less than or equal to 10");
        assert_eq!(header(10, Mode::First), "First 10 primes");
    }

    #[test]
    fn generate_never_overwrites() {
        let path = temp_path("generate");
        let _ = std::fs::remove_file(&path);

        run_generate("30", &path, Mode::LessThan, 1).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_primes(Cursor::new(contents)).unwrap(), [2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);

        assert!(run_generate("30", &path, Mode::LessThan, 1).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn generate_rejects_invalid_input() {
        let path = temp_path("invalid");
        assert!(run_generate("ten", &path, Mode::LessThan, 1).is_err());
        assert!(run_generate("-1", &path, Mode::LessThan, 1).is_err());
        assert!(run_generate("0", &path, Mode::First, 1).is_err());
        assert!(run_generate("10", &PathBuf::from(" "), Mode::LessThan, 1).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn endings_table() {
        let table = format_endings(&EndingDigits::from_primes(first_primes(10).unwrap()));
        assert!(table.contains("Digit Distribution (10 primes)"));
        assert!(table.contains("Pair Distribution (7 pairs)"));
        assert!(table.contains("30.000%"));
    }
}

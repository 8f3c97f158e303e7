/// puff – decompressor for files written by `huff`.
///
///   puff in.huf out.bin      → rebuild the code tree from the header, decode the body
///   puff -q in.huf out.bin   → same, silently
///   puff -v in.huf out.bin   → also list the code of every byte that occurs
use std::env;
use std::process::ExitCode;

use huff::bitio::BitReader;
use huff::cli::{self, CliError, Command, Console, Opts};
use huff::report;
use huff::streaming::{self, StreamResult};
use huff::CodeTree;

const PROGRAM: &str = "puff";

fn decompress_file(opts: &Opts) -> StreamResult<()> {
    let console = Console { quiet: opts.quiet };

    // Both files are opened before the header is read.
    let mut reader = BitReader::open(&opts.input)?;
    let mut output = streaming::create_output(&opts.output)?;

    console.say("\nReading header from compressed file...");
    let counts = reader.read_header()?;
    let mut tree = CodeTree::new();
    for (byte, &count) in (0..=255u8).zip(counts.iter()) {
        tree.set_count(byte, count);
    }
    let stats = tree.compute_probabilities();
    console.say(report::format_statistics(&stats));

    tree.build_tree()?;
    tree.build_codes()?;
    if opts.verbose && !opts.quiet {
        println!("\nCalculated Huffman codes for bytes with nonzero counts...\n");
        println!("{}", report::format_codes(&tree)?);
    }

    console.say("\nDecompression Phase...");
    let decoded =
        streaming::decode_stream(&mut reader, &mut output, &tree, console.progress("Have processed"))?;
    console.done(format_args!(
        "Have processed: {decoded} total bytes of output."
    ));
    Ok(())
}

fn run<I>(args: I) -> Result<(), ()>
where
    I: IntoIterator<Item = String>,
{
    let opts = match cli::parse_args(args) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::banner(PROGRAM));
            println!("{}", cli::usage(PROGRAM));
            return Ok(());
        }
        Err(e @ CliError::WrongArgumentCount) => {
            eprintln!("{PROGRAM}: {e}");
            eprintln!();
            eprintln!("{}", cli::usage(PROGRAM));
            return Err(());
        }
        Err(e) => {
            eprintln!("{PROGRAM}: {e}");
            return Err(());
        }
    };

    if !opts.quiet {
        println!("{}", cli::banner(PROGRAM));
    }
    if let Err(e) = decompress_file(&opts) {
        eprintln!("\n{PROGRAM}: {e}");
        return Err(());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(env::args().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

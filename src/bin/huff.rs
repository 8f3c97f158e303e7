/// huff – order-0 Huffman compressor.
///
///   huff in.bin out.huf      → count bytes, print statistics, write header + codes
///   huff -q in.bin out.huf   → same, silently
///   huff -v in.bin out.huf   → also list the code of every byte that occurs
use std::env;
use std::io::{Seek, SeekFrom};
use std::process::ExitCode;

use huff::bitio::{BitWriter, HEADER_SIZE};
use huff::cli::{self, CliError, Command, Console, Opts};
use huff::report;
use huff::streaming::{self, StreamResult};
use huff::CodeTree;

const PROGRAM: &str = "huff";

fn compress_file(opts: &Opts) -> StreamResult<()> {
    let console = Console { quiet: opts.quiet };

    // Both files are opened before any analysis.
    let mut input = streaming::open_input(&opts.input)?;
    let mut writer = BitWriter::create(&opts.output)?;

    console.say("\nAnalysis Phase...");
    let mut tree = CodeTree::new();
    let total = streaming::count_stream(&mut input, &mut tree, console.progress("Have read"))?;
    console.done(format_args!("Have read: {total} bytes total."));

    console.say("\nComputing probabilities...");
    let stats = tree.compute_probabilities();
    console.say(report::format_statistics(&stats));

    console.say("\nConstructing the Huffman code tree...");
    tree.build_tree()?;
    console.say("Assigning new bit patterns for the bytes in the file...");
    tree.build_codes()?;

    if opts.verbose && !opts.quiet {
        println!("\nCalculated Huffman codes for bytes with nonzero counts...\n");
        println!("{}", report::format_codes(&tree)?);
    }

    console.say("\nCompression Phase...");
    input.seek(SeekFrom::Start(0))?;
    writer.write_header(&tree.counts())?;
    let encoded =
        streaming::encode_stream(&mut input, &mut writer, &tree, console.progress("Have processed"))?;
    let bits = writer.bits_written();
    writer.finish()?;
    console.done(format_args!(
        "Have processed: {encoded} total bytes of input."
    ));

    let written = HEADER_SIZE as u64 + bits.div_ceil(8);
    match tree.average_code_length() {
        Some(avg) => console.say(format_args!(
            "Wrote {written} bytes ({avg:.2} bits/byte, header {HEADER_SIZE} bytes)."
        )),
        None => console.say(format_args!("Wrote {written} bytes (header only).")),
    }
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
    if let Err(e) = compress_file(&opts) {
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

use std::time::Duration;

use log::{info, LevelFilter};
use mcs::{max_common_subgraph, validate_mapping, McsConfig};
use mcs_graph::{read_graph, Format};
use num_format::{Locale, ToFormattedString};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::create()?;

    env_logger::Builder::from_default_env()
        .filter_level(if args.quiet {
            LevelFilter::Error
        } else if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let format = if args.dimacs {
        Format::Dimacs
    } else if args.lad {
        Format::Lad
    } else {
        Format::VfBinary
    };

    let g0 = read_graph(
        &args.filename1,
        format,
        args.directed,
        args.edge_labelled,
        args.vertex_labelled,
    )?;
    let g1 = read_graph(
        &args.filename2,
        format,
        args.directed,
        args.edge_labelled,
        args.vertex_labelled,
    )?;

    let config = McsConfig {
        directed: args.directed,
        edge_labelled: args.edge_labelled,
        vertex_labelled: args.vertex_labelled,
        connected: args.connected,
        big_first: args.big_first,
        heuristic: args.heuristic,
        threads: args.threads,
        timeout: args.timeout.map(Duration::from_secs),
    };

    let solution = max_common_subgraph(&g0, &g1, config);

    if !validate_mapping(&g0, &g1, &solution.mapping) {
        eprintln!("error: solver returned an invalid mapping");
        std::process::exit(1);
    }

    info!(
        "explored {} search nodes in {:?}",
        solution.nodes.to_formatted_string(&Locale::en),
        solution.elapsed
    );

    println!("Solution size {}", solution.size());
    let pairs: Vec<String> = solution
        .mapping
        .iter()
        .map(|pair| format!("({} -> {})", pair.v, pair.w))
        .collect();
    println!("{}", pairs.join(" "));
    println!("Nodes:                      {}", solution.nodes);
    println!("CPU time (ms):              {}", solution.elapsed.as_millis());
    if solution.aborted {
        println!("TIMEOUT");
    }

    Ok(())
}

mod cli {
    use std::path::PathBuf;

    use mcs::Heuristic;

    const HELP: &str = "\
Find a maximum common subgraph of two graphs.

USAGE:
  mcs [OPTIONS] HEURISTIC FILENAME1 FILENAME2

  HEURISTIC is min_max or min_product.

OPTIONS:
  -q, --quiet                 Quiet output
  -v, --verbose               Verbose output
  -d, --dimacs                Read DIMACS format
  -l, --lad                   Read LAD format
  -c, --connected             Solve max common CONNECTED subgraph problem
  -i, --directed              Use directed graphs
  -a, --labelled              Use edge and vertex labels
  -x, --vertex-labelled-only  Use vertex labels, but not edge labels
  -b, --big-first             First try to find an induced subgraph
                              isomorphism, then decrement the target size
  -t, --timeout SECS          Specify a timeout (seconds)
  -T, --threads N             Specify how many threads to use
  -h, --help                  Print help
";

    #[derive(Debug)]
    pub(crate) struct AppArgs {
        pub(crate) quiet: bool,
        pub(crate) verbose: bool,
        pub(crate) dimacs: bool,
        pub(crate) lad: bool,
        pub(crate) connected: bool,
        pub(crate) directed: bool,
        pub(crate) edge_labelled: bool,
        pub(crate) vertex_labelled: bool,
        pub(crate) big_first: bool,
        pub(crate) timeout: Option<u64>,
        pub(crate) threads: usize,
        pub(crate) heuristic: Heuristic,
        pub(crate) filename1: PathBuf,
        pub(crate) filename2: PathBuf,
    }

    pub(crate) fn create() -> Result<AppArgs, Box<dyn std::error::Error>> {
        let mut pargs = pico_args::Arguments::from_env();

        if pargs.contains(["-h", "--help"]) {
            print!("{HELP}");
            std::process::exit(0);
        }

        let dimacs = pargs.contains(["-d", "--dimacs"]);
        let lad = pargs.contains(["-l", "--lad"]);
        if dimacs && lad {
            return Err("the -d and -l options cannot be used together".into());
        }

        let connected = pargs.contains(["-c", "--connected"]);
        let directed = pargs.contains(["-i", "--directed"]);
        if connected && directed {
            return Err("the -c and -i options cannot be used together".into());
        }

        let labelled = pargs.contains(["-a", "--labelled"]);
        let vertex_labelled_only = pargs.contains(["-x", "--vertex-labelled-only"]);
        if labelled && vertex_labelled_only {
            return Err("the -a and -x options cannot be used together".into());
        }

        let args = AppArgs {
            quiet: pargs.contains(["-q", "--quiet"]),
            verbose: pargs.contains(["-v", "--verbose"]),
            dimacs,
            lad,
            connected,
            directed,
            edge_labelled: labelled,
            vertex_labelled: labelled || vertex_labelled_only,
            big_first: pargs.contains(["-b", "--big-first"]),
            timeout: pargs.opt_value_from_str(["-t", "--timeout"])?,
            threads: pargs.opt_value_from_str(["-T", "--threads"])?.unwrap_or(0),
            heuristic: pargs.free_from_str()?,
            filename1: pargs.free_from_os_str(as_path_buf)?,
            filename2: pargs.free_from_os_str(as_path_buf)?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(format!("unexpected arguments: {remaining:?}").into());
        }

        Ok(args)
    }

    fn as_path_buf(arg: &std::ffi::OsStr) -> Result<PathBuf, std::convert::Infallible> {
        Ok(arg.into())
    }
}

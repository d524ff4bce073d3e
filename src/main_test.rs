#[cfg(test)]
mod tests {
    use crate::{
        Args, build_labels, has_header, parse_points, read_points_and_csv, summarize,
        valid_coordinates, write_labelled_csv,
    };
    use clap::Parser;
    use geo_kmeans::{Cluster, KMeans, KMeansConfig, Point, PointList};
    use std::fs;

    #[test]
    fn test_main_program() {
        // Create a test CSV file
        let test_csv = "latitude,longitude,id
40.7128,-74.0060,a
40.7130,-74.0062,b
34.0522,-118.2437,c
34.0524,-118.2439,d
not,a-point,e
40.7132,-74.0064,f
34.0526,-118.2441,g";

        let test_file = std::env::temp_dir().join("test_points_geo_kmeans.csv");
        fs::write(&test_file, test_csv).expect("Failed to create test CSV");

        // Read points
        let (points, records) = read_points_and_csv(&test_file).expect("Failed to read CSV");
        fs::remove_file(&test_file).ok();

        assert_eq!(records.len(), 8);
        assert_eq!(points.len(), 6);

        let coords: PointList = points.iter().map(|(_, p)| *p).collect();
        let result = KMeans::new(KMeansConfig::new(2).with_seed(1))
            .run(&coords)
            .expect("Failed to cluster");
        assert!(result.converged);

        let labels = build_labels(&result.clusters, &points, records.len());
        assert_eq!(labels[0], None);
        assert_eq!(labels[5], None);

        // New York rows share a label, Los Angeles rows share the other one
        let ny = labels[1].expect("row 1 labelled");
        let la = labels[3].expect("row 3 labelled");
        assert_ne!(ny, la);
        assert_eq!(labels[2], Some(ny));
        assert_eq!(labels[6], Some(ny));
        assert_eq!(labels[4], Some(la));
        assert_eq!(labels[7], Some(la));

        let mut out = Vec::new();
        write_labelled_csv(&mut out, &records, &labels).expect("Failed to write CSV");
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "latitude,longitude,id,cluster");
        assert_eq!(lines[1], format!("40.7128,-74.0060,a,{}", ny));
        assert_eq!(lines[5], "not,a-point,e,");
    }

    #[test]
    fn test_parse_points() {
        let test_cases = vec![
            (
                "with header",
                vec![vec!["lat", "lon"], vec!["1.5", "2.5"]],
                true,
                vec![(1, Point::new(1.5, 2.5))],
            ),
            (
                "no header",
                vec![vec!["1", "2"], vec![" 3 ", "4"]],
                false,
                vec![(0, Point::new(1.0, 2.0)), (1, Point::new(3.0, 4.0))],
            ),
            (
                "short row",
                vec![vec!["1"], vec!["3", "4"]],
                false,
                vec![(1, Point::new(3.0, 4.0))],
            ),
            (
                "not finite",
                vec![vec!["1", "2"], vec!["NaN", "0"], vec!["0", "inf"], vec!["-inf", "1"]],
                false,
                vec![(0, Point::new(1.0, 2.0))],
            ),
            (
                "out of range",
                vec![vec!["200", "0"], vec!["-90.5", "0"], vec!["0", "180.1"], vec!["90", "-180"]],
                false,
                vec![(3, Point::new(90.0, -180.0))],
            ),
            ("empty", vec![], false, vec![]),
        ];

        for (name, rows, header, expected) in test_cases {
            let records: Vec<Vec<String>> = rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect();
            assert_eq!(has_header(&records), header, "test case {}", name);
            assert_eq!(parse_points(&records), expected, "test case {}", name);
        }
    }

    #[test]
    fn test_valid_coordinates() {
        assert!(valid_coordinates(0.0, 0.0));
        assert!(valid_coordinates(-90.0, 180.0));
        assert!(!valid_coordinates(f64::NAN, 0.0));
        assert!(!valid_coordinates(0.0, f64::NAN));
        assert!(!valid_coordinates(f64::INFINITY, 0.0));
        assert!(!valid_coordinates(0.0, f64::NEG_INFINITY));
        assert!(!valid_coordinates(90.5, 0.0));
        assert!(!valid_coordinates(0.0, -180.5));
    }

    #[test]
    fn test_build_labels() {
        let points = vec![
            (0, Point::new(0.0, 0.0)),
            (2, Point::new(1.0, 1.0)),
            (3, Point::new(2.0, 2.0)),
        ];
        let clusters = vec![
            Cluster {
                c: 0,
                center: Point::new(0.5, 0.5),
                points: vec![0, 1],
            },
            Cluster {
                c: 1,
                center: Point::new(2.0, 2.0),
                points: vec![2],
            },
        ];
        let labels = build_labels(&clusters, &points, 4);
        assert_eq!(labels, vec![Some(0), None, Some(0), Some(1)]);
    }

    #[test]
    fn test_summarize() {
        let points = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let clusters = vec![
            Cluster {
                c: 0,
                center: Point::new(2.0, 3.0),
                points: vec![0, 1],
            },
            Cluster::new(1, Point::new(1.0, 2.0)),
        ];
        let lines = summarize(&clusters, &points);
        assert_eq!(
            lines[0],
            "cluster 0: 2 points, center (2.000000, 3.000000), bounds (1.000000, 2.000000)-(3.000000, 4.000000)"
        );
        assert_eq!(lines[1], "cluster 1: empty, center (1.000000, 2.000000)");
    }

    #[test]
    fn test_args_config() {
        let args = Args::parse_from([
            "geo_kmeans",
            "-k",
            "3",
            "--seed",
            "7",
            "--max-iterations",
            "20",
        ]);
        assert_eq!(
            args.config(),
            KMeansConfig::new(3).with_seed(7).with_max_iterations(20)
        );

        let args = Args::parse_from(["geo_kmeans"]);
        assert_eq!(args.config(), KMeansConfig::new(8));
        assert!(!args.debug);
        assert!(args.output.is_none());
    }
}

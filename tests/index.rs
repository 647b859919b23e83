use std::collections::HashSet;

use protkmer::kmer::kmer_count;
use protkmer::prelude::*;

const REFERENCES: [(&str, &str); 5] = [
    ("MKTAYIAKQRQISFVKSHFSRQ", "regulator"),
    ("MSDNGPQNQRNAPRITFGGPSD", "nucleocapsid"),
    ("MFVFLVLLPLVSSQCVNLTTRT", "spike"),
    ("MESLVPGFNEKTHVQLSLPVLQ", "replicase"),
    ("MADQLTEEQIAEFKEAFSLFDK", "calmodulin"),
];

fn reference_index() -> KmerIndex<String> {
    let index = KmerIndex::new(&IndexConfig::default()).unwrap();
    for (seq, annotation) in REFERENCES.iter() {
        index.add_protein(seq.as_bytes(), annotation.to_string()).unwrap();
    }
    index
}

#[test]
fn verbatim_query_is_identical() -> Result<()> {
    let index = reference_index();
    assert_eq!(index.ksize(), 8);
    assert_eq!(index.protein_count(), 5);

    for (seq, annotation) in REFERENCES.iter() {
        let best = index.find_closest(seq.as_bytes())?.unwrap();
        assert_eq!(best.payload(), annotation);
        assert_eq!(best.shared_kmers(), kmer_count(seq.len(), 8));
        assert_eq!(best.similarity(), 1.0);
    }
    Ok(())
}

#[test]
fn unrelated_query_is_not_found() -> Result<()> {
    let index = reference_index();
    assert!(index.find_closest(b"WWWWWWWWWWWWWWWWWWWW")?.is_none());
    assert!(index.find_close(b"WWWWWWWWWWWWWWWWWWWW", 0.0)?.is_empty());

    // shorter than k: no k-mers at all
    assert!(index.find_closest(b"MKTAYIA")?.is_none());
    Ok(())
}

#[test]
fn partial_overlap() -> Result<()> {
    let index = reference_index();

    // first 14 residues of the spike reference, then filler
    let query = b"MFVFLVLLPLVSSQWWWWWWWW";
    let best = index.find_closest(query)?.unwrap();
    assert_eq!(best.payload(), "spike");
    assert_eq!(best.shared_kmers(), 7);
    assert_eq!(best.similarity(), 7.0 / 23.0);

    assert_eq!(index.find_close(query, 0.3)?.len(), 1);
    assert!(index.find_close(query, 0.5)?.is_empty());
    Ok(())
}

#[test]
fn identifiers_are_content_addressed() -> Result<()> {
    let index = reference_index();
    let upper = index.add_protein(b"MKTAYIAKQRQISFVKSHFSRQ", "again".into())?;
    let lower = index.add_protein(b"mktayiakqrqisfvkshfsrq", "lower".into())?;

    assert_eq!(upper, lower);
    assert_eq!(upper.as_str().len(), 32);
    assert_eq!(index.protein_count(), 5);
    assert_eq!(index.get(upper.as_str()), Some("lower".into()));
    Ok(())
}

#[test]
fn shards_partition_kmers() {
    let index = reference_index();
    let sizes = index.shard_sizes();
    assert_eq!(sizes.len(), 29);
    assert_eq!(sizes.iter().sum::<usize>(), index.kmer_count());

    let distinct: HashSet<&[u8]> = REFERENCES
        .iter()
        .flat_map(|(seq, _)| seq.as_bytes().windows(8))
        .collect();
    assert_eq!(index.kmer_count(), distinct.len());
}

#[test]
fn concurrent_adds_and_queries() -> Result<()> {
    let index: KmerIndex<usize> = KmerIndex::new(&IndexConfig::builder().ksize(5).build())?;

    let sequences: Vec<String> = (0..64)
        .map(|i| {
            let a = protkmer::encodings::ALPHABET[i % 20] as char;
            let b = protkmer::encodings::ALPHABET[(i / 20) % 20] as char;
            format!("MKV{}{}LAAGIVGHH{}{}", a, b, b, a)
        })
        .collect();

    std::thread::scope(|s| {
        for (t, chunk) in sequences.chunks(16).enumerate() {
            let index = &index;
            s.spawn(move || {
                for (i, seq) in chunk.iter().enumerate() {
                    index.add_protein(seq.as_bytes(), t * 16 + i).unwrap();
                    index.find_closest(seq.as_bytes()).unwrap().unwrap();
                }
            });
        }
    });

    assert_eq!(index.protein_count(), 64);
    for seq in &sequences {
        let best = index.find_closest(seq.as_bytes())?.unwrap();
        assert_eq!(best.similarity(), 1.0);
    }
    Ok(())
}

/*!

This is the long-form manual for `voter_satisfaction` and `vsesim`.

## Quick start

Compare score voting and majority approval voting on 100 electorates of 101 voters
and 4 candidates, generated by the default Polya model:

```bash
vsesim --voters 101 --candidates 4 --iterations 100 --method score --method mav --seed 42
```

The program logs one line per method:

```text
[INFO  vsesim::sim] Score: honest 0.912 strategic 0.871 one-sided 0.884 (undefined: 0, one-sided mattered: 0.07)
[INFO  vsesim::sim] Mav: honest 0.905 strategic 0.890 one-sided 0.893 (undefined: 0, one-sided mattered: 0.04)
```

(your numbers will differ)

The complete results can be saved with the `--out` flag, in JSON format. When a seed is
given, the output is fully reproducible: pass a previous output to `--reference` to check
that a run still produces exactly the same results.

## Voter satisfaction efficiency

For one electorate, the social utility of a candidate is the mean utility of all the voters
for that candidate. The VSE of electing candidate `w` is:

```text
(social_utility[w] - mean(social_utility)) / (max(social_utility) - mean(social_utility))
```

It is 1 when the best candidate for society is elected, and 0 for the average outcome of
picking a candidate at random. It can be negative. It is undefined (reported as `null`) when
all the candidates have the same social utility.

Each method is run three times on every electorate:
- `honest`: all the voters cast honest ballots
- `strategic`: the honest results are used as a poll. The two best candidates of the poll
  are the frontrunners. Every voter then casts a ballot that only tells apart the
  frontrunners: the ones that prefer the runner-up bury the winner (they use strategy),
  the others stay complacent.
- `one-sided`: only the voters that used strategy cast their strategic ballot, all the
  others cast their honest ballot.

## Models

- `random`: all the utilities are independent standard normal draws.
- `reverse`: two camps of the same size, with opposite utilities. The number of voters must
  be even.
- `quality`: a base model where every voter is blended with a common random "quality"
  vector, with weight `qualityWeight` (1 by default). The default base model is `reverse`.
- `polya`: a Polya urn with mutation. The urn starts with `seedVoters` voters (2 by default)
  from a seed model (by default `quality` on top of `reverse`) and `alpha` wildcards
  (1 by default). Drawing a voter adds a mutated clone of it, blended with a random voter
  with weight `mutantFactor` (0.2 by default). Drawing a wildcard adds a new random voter.
  Clusters of similar voters emerge from this process.

With `--personality` (or `"voterKind": "personality"`), every voter drawn at random founds a
new cluster and receives a personality; the derived voters keep both.

## Methods

- `score`: voters give 0 to 10 points to each candidate, the highest mean wins. Honest voters
  give 0 to their least liked candidate and 10 to their favourite.
- `mav`, `mj`, `bucklin`: voters grade each candidate from 0 to 4 using the cutoffs
  `-0.8, 0, 0.8, 1.6` (the last one capped by their favourite). The candidates are ranked
  by median grade. Ties between equal medians are broken by looking at the votes around
  the median, with a different rule for each method.

## Configuration

Instead of the command line flags, all the options can be given in a JSON file with the
`--config` flag. Command line flags take precedence over the file.

```json
{
  "voterCount": 101,
  "candidateCount": 4,
  "iterations": 100,
  "randomSeed": 42,
  "voterKind": "personality",
  "methods": ["score", "mav", "mj", "bucklin"],
  "model": {
    "type": "polya",
    "seedVoters": 2,
    "alpha": 1,
    "mutantFactor": 0.2,
    "seedModel": {
      "type": "quality",
      "qualityWeight": 1.0,
      "baseModel": { "type": "reverse" }
    }
  }
}
```

 */

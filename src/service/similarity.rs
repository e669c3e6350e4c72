//! 模糊文本相似度

/// 参与比较的最大字符数，超出部分截断
pub const MAX_COMPARE_CHARS: usize = 256;

/// 部分匹配相似度，范围 [0, 1]
///
/// 先找出两串之间的公共子串块，把较短的串对齐到每个块在较长串上的位置，
/// 取这些等长窗口与短串的归一化编辑距离相似度的最大值。
/// 两个输入都只取前 [`MAX_COMPARE_CHARS`] 个字符；任一输入为空时返回 0。
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().take(MAX_COMPARE_CHARS).collect();
    let b: Vec<char> = b.chars().take(MAX_COMPARE_CHARS).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let last_start = longer.len() - shorter.len();

    let mut starts: Vec<usize> = matching_blocks(&shorter, &longer)
        .into_iter()
        .map(|(i, j, _)| j.saturating_sub(i).min(last_start))
        .collect();
    starts.sort_unstable();
    starts.dedup();

    let needle: String = shorter.iter().collect();
    let mut best = 0.0_f64;
    for start in starts {
        let window: String = longer[start..start + shorter.len()].iter().collect();
        let ratio = strsim::normalized_levenshtein(&needle, &window);
        if ratio > best {
            best = ratio;
            if best >= 1.0 {
                break;
            }
        }
    }
    best
}

/// 公共子串块 `(a 起点, b 起点, 长度)`
///
/// 先取整体最长公共子串，再在其左右两侧的剩余区间里递归查找，块之间互不交叉。
fn matching_blocks(a: &[char], b: &[char]) -> Vec<(usize, usize, usize)> {
    let mut blocks = Vec::new();
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, (alo, ahi), (blo, bhi));
        if size == 0 {
            continue;
        }
        blocks.push((i, j, size));
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    blocks.sort_unstable();
    blocks
}

/// 区间内的最长公共子串，多个等长时取 a、b 中最靠前的
fn longest_match(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let width = bhi - blo;
    // prev[k + 1] / cur[k + 1]：以 b[blo + k] 结尾的公共后缀长度
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];
    let mut best = (alo, blo, 0);

    for i in alo..ahi {
        for k in 0..width {
            cur[k + 1] = if a[i] == b[blo + k] { prev[k] + 1 } else { 0 };
            let size = cur[k + 1];
            if size > best.2 {
                best = (i + 1 - size, blo + k + 1 - size, size);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

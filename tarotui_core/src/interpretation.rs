use crate::card::Orientation;

pub const GENERIC_UPRIGHT: &str = "正位带来积极的能量和指引。";
pub const GENERIC_REVERSED: &str = "逆位提示需要反思和调整。";

/// Short reading shown under the meaning text.
/// Well-known cards get their own line, everything else a generic one.
pub fn interpretation(name: &str, orientation: Orientation) -> &'static str {
    let pair = match name {
        "The Fool" => Some((
            "勇敢踏上新的旅程，相信直觉的指引。",
            "新的开始受阻，需要谨慎前行。",
        )),
        "The Magician" => Some((
            "你拥有实现目标所需的一切能力，是时候采取行动了。",
            "才能被浪费，需要重新审视自己的能力。",
        )),
        "The High Priestess" => Some((
            "相信你的直觉，潜意识中蕴含着答案。",
            "直觉被压抑，需要倾听内心的声音。",
        )),
        "The Empress" => Some((
            "丰饶与创造力的象征，是成长和收获的时期。",
            "创造力受阻，需要关注内在的滋养。",
        )),
        "The Lovers" => Some((
            "爱与和谐的能量，重要的选择即将到来。",
            "关系出现不和谐，需要重新审视选择。",
        )),
        "The Hermit" => Some(("内省的时期，独处将带来智慧。", "过度孤立，需要与外界连接。")),
        "Death" => Some(("结束与转变，为新生命让路。", "抗拒改变，停滞不前。")),
        "The World" => Some(("完成与整合，一个周期的圆满结束。", "缺乏闭环，有未完成的事务。")),
        _ => None,
    };

    match (pair, orientation) {
        (Some((up, _)), Orientation::Upright) => up,
        (Some((_, rev)), Orientation::Reversed) => rev,
        (None, Orientation::Upright) => GENERIC_UPRIGHT,
        (None, Orientation::Reversed) => GENERIC_REVERSED,
    }
}
